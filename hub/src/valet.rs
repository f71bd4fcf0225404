use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use thiserror::Error;

use crate::validate::DATE_FORMAT;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("observations request timed out")]
    Timeout,
    #[error("observations request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("observations endpoint returned HTTP {0}")]
    Status(u16),
    #[error("malformed observations payload: {0}")]
    Decode(String),
    #[error("series {0} missing from observations")]
    MissingSeries(String),
    #[error("non-numeric value {raw:?} for {series} on {date}")]
    InvalidValue {
        date: NaiveDate,
        series: String,
        raw: String,
    },
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Http(e)
        }
    }
}

// ── Wire format ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ObservationsBody {
    observations: Vec<RawObservation>,
}

/// `{"d": "2023-01-03", "FXUSDCAD": {"v": "1.3541"}, ...}`
#[derive(Debug, Deserialize)]
struct RawObservation {
    d: NaiveDate,
    #[serde(flatten)]
    values: HashMap<String, RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    v: String,
}

// ── Table ───────────────────────────────────────────────────────────────

/// Observations keyed by date (ascending), one column per requested series.
///
/// A date may lack a value for some series; nothing is assumed about
/// positional correspondence between columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    rows: BTreeMap<NaiveDate, BTreeMap<String, f64>>,
}

/// Two series joined on the dates where both have a value.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    pub dates: Vec<NaiveDate>,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    /// Dates present in the table but missing one of the two values.
    pub dropped: usize,
}

impl ObservationTable {
    pub fn insert(&mut self, date: NaiveDate, series: &str, value: f64) {
        self.rows
            .entry(date)
            .or_default()
            .insert(series.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Inner join of two columns on date.
    ///
    /// A series that has no value on any date is an error rather than an
    /// empty join, since that means the endpoint ignored the identifier.
    pub fn aligned(&self, a: &str, b: &str) -> Result<AlignedPair, FetchError> {
        for id in [a, b] {
            let seen = self.rows.values().any(|row| row.contains_key(id));
            if !self.rows.is_empty() && !seen {
                return Err(FetchError::MissingSeries(id.to_string()));
            }
        }

        let mut out = AlignedPair {
            dates: Vec::with_capacity(self.rows.len()),
            a: Vec::with_capacity(self.rows.len()),
            b: Vec::with_capacity(self.rows.len()),
            dropped: 0,
        };
        for (date, row) in &self.rows {
            match (row.get(a), row.get(b)) {
                (Some(x), Some(y)) => {
                    out.dates.push(*date);
                    out.a.push(*x);
                    out.b.push(*y);
                }
                _ => out.dropped += 1,
            }
        }
        Ok(out)
    }
}

fn parse_observations(body: ObservationsBody) -> Result<ObservationTable, FetchError> {
    let mut table = ObservationTable::default();
    for obs in body.observations {
        for (id, raw) in obs.values {
            let value = raw
                .v
                .trim()
                .parse::<f64>()
                .map_err(|_| FetchError::InvalidValue {
                    date: obs.d,
                    series: id.clone(),
                    raw: raw.v.clone(),
                })?;
            table.insert(obs.d, &id, value);
        }
    }
    Ok(table)
}

/// Decode a raw observations body into a table.
pub fn decode_observations(bytes: &[u8]) -> Result<ObservationTable, FetchError> {
    let body: ObservationsBody =
        serde_json::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
    parse_observations(body)
}

/// `{base}/{id1,id2}?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`
pub fn observations_url(
    base: &str,
    series: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> String {
    format!(
        "{}/{}?start_date={}&end_date={}",
        base.trim_end_matches('/'),
        series.join(","),
        start.format(DATE_FORMAT),
        end.format(DATE_FORMAT),
    )
}

// ── Source ──────────────────────────────────────────────────────────────

/// Anything that can produce observations for a set of series over a range.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    async fn fetch(
        &self,
        series: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ObservationTable, FetchError>;
}

/// HTTP client for the Valet observations endpoint.
pub struct ValetClient {
    base_url: String,
    http: Client,
}

impl ValetClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(concat!("fxcorr-hub/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(FetchError::Http)?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }
}

#[async_trait]
impl ObservationSource for ValetClient {
    async fn fetch(
        &self,
        series: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ObservationTable, FetchError> {
        let url = observations_url(&self.base_url, series, start, end);
        tracing::debug!(%url, "fetching observations");

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let bytes = resp.bytes().await?;
        let table = decode_observations(&bytes)?;

        if table.is_empty() {
            tracing::debug!(%start, %end, "no observations in range");
        } else {
            tracing::debug!(rows = table.len(), "observations decoded");
        }
        Ok(table)
    }
}
