//! Goal API routes

use crate::error::ApiResult;
use crate::state::ServerState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use fitpulse_shared::models::UserGoal;
use tracing::info;

/// Create goal routes
pub fn goal_routes() -> Router<ServerState> {
    Router::new().route("/", get(get_goal).put(update_goal))
}

/// GET /api/v1/goal - The active goal
async fn get_goal(State(state): State<ServerState>) -> Json<UserGoal> {
    let snapshot = state.store.read().await.snapshot();
    Json(snapshot.goal.clone())
}

/// PUT /api/v1/goal - Replace the goal
async fn update_goal(
    State(state): State<ServerState>,
    payload: Result<Json<UserGoal>, JsonRejection>,
) -> ApiResult<Json<UserGoal>> {
    let Json(goal) = payload?;
    let snapshot = state.store.write().await.update_goal(goal);
    info!(goal = %snapshot.goal.goal_type, "Goal updated");
    Ok(Json(snapshot.goal.clone()))
}
