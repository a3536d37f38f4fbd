//! Coaching insight routes

use crate::state::ServerState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use fitpulse_shared::models::InsightBatch;

/// Create insight routes
pub fn insight_routes() -> Router<ServerState> {
    Router::new().route("/", get(current_insights).post(refresh_insights))
}

/// GET /api/v1/insights - The batch on display, 204 before the first fetch
async fn current_insights(State(state): State<ServerState>) -> Response {
    match state.insights.read().await.current() {
        Some(batch) => Json(batch.clone()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// POST /api/v1/insights - Ask the coach for fresh insights
///
/// Always succeeds; service failures come back as the fallback batch. The
/// store lock is released before the advice call.
async fn refresh_insights(State(state): State<ServerState>) -> Json<InsightBatch> {
    let snapshot = state.store.read().await.snapshot();
    let batch = state.advice.fetch_insights(&snapshot).await;

    state.insights.write().await.publish(batch.clone());
    Json(batch)
}
