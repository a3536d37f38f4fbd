//! Dashboard and raw state routes

use crate::state::ServerState;
use axum::{extract::State, Json};
use fitpulse_shared::metrics::DashboardSummary;
use fitpulse_shared::models::AppState;

/// GET /api/v1/state - The whole state document
pub async fn get_state(State(state): State<ServerState>) -> Json<AppState> {
    let snapshot = state.store.read().await.snapshot();
    Json(AppState::clone(&snapshot))
}

/// GET /api/v1/dashboard - Progress cards, recent workouts and the 7-day trend
pub async fn get_dashboard(State(state): State<ServerState>) -> Json<DashboardSummary> {
    let snapshot = state.store.read().await.snapshot();
    Json(DashboardSummary::from_state(&snapshot))
}
