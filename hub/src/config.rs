use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_VALET_BASE_URL: &str = "https://www.bankofcanada.ca/valet/observations";

/// The two series compared on every request, with their display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPair {
    pub a: String,
    pub a_label: String,
    pub b: String,
    pub b_label: String,
}

impl SeriesPair {
    pub fn ids(&self) -> Vec<String> {
        vec![self.a.clone(), self.b.clone()]
    }
}

impl Default for SeriesPair {
    fn default() -> Self {
        Self {
            a: "FXUSDCAD".to_string(),
            a_label: "USD/CAD".to_string(),
            b: "AVG.INTWO".to_string(),
            b_label: "CORRA".to_string(),
        }
    }
}

/// Hub configuration derived from environment variables.
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub bind: String,
    pub port: u16,

    // ── Observations endpoint ──────────────────────────────────────
    pub valet_base_url: String,
    pub http_timeout: Duration,
    pub series: SeriesPair,

    // ── Static form page ───────────────────────────────────────────
    pub static_dir: PathBuf,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl HubConfig {
    pub fn from_env() -> Self {
        let defaults = SeriesPair::default();
        let series = SeriesPair {
            a: env_str("FXCORR_SERIES_A", &defaults.a),
            a_label: env_str("FXCORR_SERIES_A_LABEL", &defaults.a_label),
            b: env_str("FXCORR_SERIES_B", &defaults.b),
            b_label: env_str("FXCORR_SERIES_B_LABEL", &defaults.b_label),
        };

        let valet_base_url = env_str("FXCORR_VALET_BASE_URL", DEFAULT_VALET_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            bind: env_str("FXCORR_BIND", "127.0.0.1"),
            port: env_u16("FXCORR_PORT", 61020),
            valet_base_url,
            http_timeout: Duration::from_secs(env_u64("FXCORR_HTTP_TIMEOUT_SECS", 15).max(1)),
            series,
            static_dir: PathBuf::from(env_str("FXCORR_STATIC_DIR", "hub/frontend/dist")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "FXCORR_BIND",
        "FXCORR_PORT",
        "FXCORR_VALET_BASE_URL",
        "FXCORR_HTTP_TIMEOUT_SECS",
        "FXCORR_SERIES_A",
        "FXCORR_SERIES_A_LABEL",
        "FXCORR_SERIES_B",
        "FXCORR_SERIES_B_LABEL",
        "FXCORR_STATIC_DIR",
    ];

    fn snapshot() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|k| (*k, env::var(k).ok())).collect()
    }

    fn restore(prev: Vec<(&'static str, Option<String>)>) {
        for (k, v) in prev {
            match v {
                Some(v) => unsafe { env::set_var(k, v) },
                None => unsafe { env::remove_var(k) },
            }
        }
    }

    #[test]
    fn defaults_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        let prev = snapshot();
        for k in VARS {
            unsafe { env::remove_var(k) };
        }

        let cfg = HubConfig::from_env();
        assert_eq!(cfg.bind, "127.0.0.1");
        assert_eq!(cfg.port, 61020);
        assert_eq!(cfg.valet_base_url, DEFAULT_VALET_BASE_URL);
        assert_eq!(cfg.http_timeout, Duration::from_secs(15));
        assert_eq!(cfg.series, SeriesPair::default());
        assert_eq!(cfg.series.ids(), vec!["FXUSDCAD", "AVG.INTWO"]);

        restore(prev);
    }

    #[test]
    fn overrides_are_trimmed_and_clamped() {
        let _guard = ENV_LOCK.lock().unwrap();
        let prev = snapshot();
        unsafe {
            env::set_var("FXCORR_PORT", " 8088 ");
            env::set_var("FXCORR_VALET_BASE_URL", "http://localhost:9000/valet/observations/");
            env::set_var("FXCORR_HTTP_TIMEOUT_SECS", "0");
            env::set_var("FXCORR_SERIES_B", "  ");
            env::set_var("FXCORR_SERIES_A", "FXEURCAD");
        }

        let cfg = HubConfig::from_env();
        assert_eq!(cfg.port, 8088);
        assert_eq!(cfg.valet_base_url, "http://localhost:9000/valet/observations");
        assert_eq!(cfg.http_timeout, Duration::from_secs(1));
        assert_eq!(cfg.series.a, "FXEURCAD");
        assert_eq!(cfg.series.b, "AVG.INTWO");

        restore(prev);
    }
}
