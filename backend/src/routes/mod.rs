//! Route definitions for the FitPulse API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::ServerState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod dashboard;
mod goal;
mod health;
mod insights;
mod stats;
mod workouts;

pub use goal::goal_routes;
pub use insights::insight_routes;
pub use stats::stats_routes;
pub use workouts::workout_routes;

/// Headroom on top of the advice timeout before a request is cut off
const REQUEST_TIMEOUT_HEADROOM_SECS: u64 = 15;

/// Create the main application router with all middleware
pub fn create_router(state: ServerState) -> Router {
    let request_timeout =
        Duration::from_secs(state.config().ai.timeout_secs + REQUEST_TIMEOUT_HEADROOM_SECS);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes())
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(|| async { "FitPulse API v1" }))
        .route("/state", get(dashboard::get_state))
        .route("/dashboard", get(dashboard::get_dashboard))
        .nest("/workouts", workouts::workout_routes())
        .nest("/stats", stats::stats_routes())
        .nest("/goal", goal::goal_routes())
        .nest("/insights", insights::insight_routes())
}
