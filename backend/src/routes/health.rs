//! Health check endpoints
//!
//! Provides Kubernetes-compatible health check endpoints:
//! - /health - Basic health check
//! - /health/ready - Readiness probe (checks the storage slot)
//! - /health/live - Liveness probe (always returns OK if server is running)

use crate::state::ServerState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: CheckStatus,
    pub advice: CheckStatus,
}

/// Status of an individual check
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// Readiness probe - checks if the service is ready to accept traffic
/// Returns 503 if the storage slot cannot be read
pub async fn readiness_check(
    State(state): State<ServerState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let slot = Arc::clone(&state.slot);
    let storage = match tokio::task::spawn_blocking(move || slot.read()).await {
        Ok(Ok(_)) => CheckStatus {
            status: "healthy".to_string(),
            message: None,
        },
        Ok(Err(e)) => CheckStatus {
            status: "unhealthy".to_string(),
            message: Some(e.to_string()),
        },
        Err(e) => CheckStatus {
            status: "unhealthy".to_string(),
            message: Some(format!("storage check did not finish: {}", e)),
        },
    };

    // Advice always degrades to a fallback, so it never blocks readiness
    let advice = CheckStatus {
        status: if state.advice.is_enabled() { "enabled" } else { "fallback_only" }.to_string(),
        message: None,
    };

    let is_healthy = storage.status == "healthy";

    let response = HealthResponse {
        status: if is_healthy { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks { storage, advice }),
    };

    if is_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe - checks if the service is alive
/// Always returns OK if the server is running
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}
