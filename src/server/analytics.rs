//! Analytics API routes

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::analytics::{AnalyticsData, AnalyticsKind};

use super::api_error::ApiError;
use super::metrics::record_analytics;
use super::search::resolve_limit;
use super::state::{GuardedAnalytics, ServerState};
use super::ServerConfig;

#[derive(Deserialize)]
struct AnalyticsParams {
    #[serde(rename = "type")]
    kind: Option<String>,
    limit: Option<String>,
}

/// GET /analytics?type=&limit=
///
/// Unknown types return the full report.
async fn analytics(
    State(analytics): State<GuardedAnalytics>,
    State(config): State<ServerConfig>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<AnalyticsData>, ApiError> {
    let kind = AnalyticsKind::from_param(params.kind.as_deref().unwrap_or("all"));
    let limit = resolve_limit(
        params.limit.as_deref(),
        config.analytics.default_artist_limit,
        usize::MAX,
    );
    record_analytics(kind.as_str());

    let data = analytics
        .query(kind, limit)
        .await
        .map_err(|e| ApiError::internal("analytics", e))?;
    Ok(Json(data))
}

pub fn make_analytics_routes(state: ServerState) -> Router {
    Router::new()
        .route("/analytics", get(analytics))
        .with_state(state)
}
