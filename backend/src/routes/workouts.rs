//! Workout logging API routes

use crate::error::{ApiError, ApiResult};
use crate::state::ServerState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fitpulse_shared::models::{Workout, EXERCISE_TYPES};
use fitpulse_shared::types::LogWorkoutRequest;
use tracing::info;
use uuid::Uuid;

/// Create workout routes
pub fn workout_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list_workouts).post(log_workout))
        .route("/types", get(exercise_types))
}

/// POST /api/v1/workouts - Log a workout
///
/// Calories left blank or zero are estimated from duration and intensity.
/// An id is generated when the client does not supply one.
async fn log_workout(
    State(state): State<ServerState>,
    payload: Result<Json<LogWorkoutRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Workout>)> {
    let Json(req) = payload?;
    if req.workout.activity.trim().is_empty() {
        return Err(ApiError::Validation("Workout type is required".to_string()));
    }

    let id = req.id.unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut store = state.store.write().await;
    let workout = req.workout.into_workout(id, store.clock().now());
    store.add_workout(workout.clone());

    info!(
        id = %workout.id,
        activity = %workout.activity,
        calories = workout.calories_burned,
        "Workout logged"
    );

    Ok((StatusCode::CREATED, Json(workout)))
}

/// GET /api/v1/workouts - All workouts, newest first
async fn list_workouts(State(state): State<ServerState>) -> Json<Vec<Workout>> {
    let snapshot = state.store.read().await.snapshot();
    Json(snapshot.workouts.clone())
}

/// GET /api/v1/workouts/types - Suggested activity labels
async fn exercise_types() -> Json<Vec<&'static str>> {
    Json(EXERCISE_TYPES.to_vec())
}
