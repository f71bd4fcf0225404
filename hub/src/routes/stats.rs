use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use crate::compute::{
    COMPUTE_ERROR_MESSAGE, StatsOutcome, StatsReport, TIMEOUT_MESSAGE, UNKNOWN_ERROR_MESSAGE,
    compute_stats,
};
use crate::error::HubError;
use crate::state::AppState;

/// Both fields optional so a missing date is a validation issue, not an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/compute_stats", get(api_compute_stats))
}

/// GET /compute_stats — High/Low/Mean per series plus their Pearson correlation.
async fn api_compute_stats(
    State(state): State<Arc<AppState>>,
    Query(q): Query<StatsQuery>,
) -> Result<Json<StatsReport>, HubError> {
    let today = chrono::Local::now().date_naive();
    let outcome = compute_stats(
        state.source.as_ref(),
        &state.config.series,
        q.start_date.as_deref(),
        q.end_date.as_deref(),
        today,
    )
    .await;

    let err = match outcome {
        StatsOutcome::Success(report) => return Ok(Json(report)),
        StatsOutcome::ValidationError(issues) => issues.into(),
        StatsOutcome::ComputeError => HubError::Unprocessable(COMPUTE_ERROR_MESSAGE.to_string()),
        StatsOutcome::Timeout => HubError::GatewayTimeout(TIMEOUT_MESSAGE.to_string()),
        StatsOutcome::UnknownError => HubError::Internal(UNKNOWN_ERROR_MESSAGE.to_string()),
    };
    Err(err)
}
