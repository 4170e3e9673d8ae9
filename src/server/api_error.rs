use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use super::metrics::record_error;
use crate::search::QueryError;

/// Failures a route hands back to the client as `{ "error": ... }`.
///
/// Storage failures are logged with their cause and reported with a fixed
/// message so internals never leak into responses.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal {
        endpoint: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    pub fn internal(endpoint: &'static str, cause: anyhow::Error) -> Self {
        ApiError::Internal { endpoint, cause }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            ApiError::NotFound(reason) => (StatusCode::NOT_FOUND, reason),
            ApiError::Internal { endpoint, cause } => {
                error!("{} failed: {:#}", endpoint, cause);
                record_error("internal", endpoint);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
