use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fxcorr_hub::config::HubConfig;
use fxcorr_hub::routes;
use fxcorr_hub::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = HubConfig::from_env();
    let bind = cfg.bind.clone();
    let port = cfg.port;
    let static_dir = cfg.static_dir.clone();

    tracing::info!(
        base_url = %cfg.valet_base_url,
        series_a = %cfg.series.a,
        series_b = %cfg.series.b,
        timeout_s = cfg.http_timeout.as_secs(),
        "observations source configured"
    );

    let state = AppState::new(cfg).context("build observations client")?;

    // Static form page at root; the API answers JSON.
    let app = Router::new()
        .merge(routes::api_router())
        .route("/health", axum::routing::get(health))
        .fallback_service(ServeDir::new(&static_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address {bind}:{port}"))?;

    tracing::info!("fxcorr hub listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;
    Ok(())
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully stopping…");
}
