//! Common test utilities for integration tests
//!
//! Builds the router over an in-memory slot, a pinned clock and a scripted
//! advice model, so no network or disk is involved.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use fitpulse_backend::{
    config::{AiConfig, AppConfig, StorageBackend},
    repositories::{MemorySlot, StateSlot},
    routes,
    services::{AdviceGateway, AdviceModel, FixedClock},
    state::ServerState,
};
use fitpulse_shared::errors::AdviceError;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Advice model that answers every prompt with the same result
pub struct ScriptedModel {
    reply: Option<String>,
}

impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl AdviceModel for ScriptedModel {
    async fn generate(&self, _prompt: &str) -> Result<String, AdviceError> {
        self.reply
            .clone()
            .ok_or_else(|| AdviceError::Status {
                status: 500,
                message: "internal".to_string(),
            })
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    pub slot: MemorySlot,
    pub clock: FixedClock,
}

impl TestApp {
    /// Fresh app starting from seed data with the advice service disabled
    pub fn new() -> Self {
        Self::build(MemorySlot::new(), AdviceGateway::disabled())
    }

    /// Fresh app whose advice model is `model`
    pub fn with_model(model: ScriptedModel) -> Self {
        let model: Arc<dyn AdviceModel> = Arc::new(model);
        Self::build(
            MemorySlot::new(),
            AdviceGateway::new(model, Duration::from_secs(5)),
        )
    }

    /// App loading whatever `slot` already holds
    pub fn with_slot(slot: MemorySlot) -> Self {
        Self::build(slot, AdviceGateway::disabled())
    }

    fn build(slot: MemorySlot, advice: AdviceGateway) -> Self {
        let clock = test_clock();
        let shared: Arc<dyn StateSlot> = Arc::new(slot.clone());
        let state = ServerState::new(test_config(), shared, Arc::new(clock), advice);
        let app = routes::create_router(state.clone());

        Self {
            app,
            state,
            slot,
            clock,
        }
    }

    /// Wait for queued state writes to reach the slot
    pub async fn flush(&self) {
        let writer = self.state.store.read().await.writer();
        writer.flush().await;
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send_json("POST", path, body).await
    }

    /// Make a PUT request with JSON body
    pub async fn put(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send_json("PUT", path, body).await
    }

    /// Make a PUT request with a plain text body
    pub async fn put_text(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("PUT")
            .uri(path)
            .header("Content-Type", "text/plain")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    async fn send_json(&self, method: &str, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

pub fn test_clock() -> FixedClock {
    FixedClock::at(Utc.with_ymd_and_hms(2025, 7, 14, 18, 0, 0).unwrap())
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.storage.backend = StorageBackend::Memory;
    config.ai = AiConfig {
        enabled: false,
        timeout_secs: 5,
        ..AiConfig::default()
    };
    config
}
