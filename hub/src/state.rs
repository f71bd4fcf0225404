use std::sync::Arc;

use crate::config::HubConfig;
use crate::valet::{FetchError, ObservationSource, ValetClient};

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub config: HubConfig,
    pub source: Arc<dyn ObservationSource>,
}

impl AppState {
    pub fn new(config: HubConfig) -> Result<Arc<Self>, FetchError> {
        let client = ValetClient::new(config.valet_base_url.clone(), config.http_timeout)?;
        Ok(Self::with_source(config, Arc::new(client)))
    }

    /// Build state around an arbitrary observation source.
    pub fn with_source(config: HubConfig, source: Arc<dyn ObservationSource>) -> Arc<Self> {
        Arc::new(Self { config, source })
    }
}
