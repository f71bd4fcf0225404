use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::validate::DateIssues;

/// Unified error type for hub API responses.
#[derive(Debug)]
pub enum HubError {
    Validation(DateIssues),
    Unprocessable(String),
    GatewayTimeout(String),
    Internal(String),
}

impl std::fmt::Display for HubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(issues) => write!(f, "validation_error: {issues}"),
            Self::Unprocessable(msg) => write!(f, "unprocessable: {msg}"),
            Self::GatewayTimeout(msg) => write!(f, "gateway_timeout: {msg}"),
            Self::Internal(msg) => write!(f, "internal_error: {msg}"),
        }
    }
}

impl std::error::Error for HubError {}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": issues.message(), "codes": issues }),
            ),
            Self::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": msg })),
            Self::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, json!({ "error": msg })),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<DateIssues> for HubError {
    fn from(issues: DateIssues) -> Self {
        Self::Validation(issues)
    }
}
