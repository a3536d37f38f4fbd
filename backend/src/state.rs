//! Application state management
//!
//! This module provides the shared server state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Cheap cloning**: All fields are behind `Arc`
//! 2. **Short critical sections**: the store lock is held only for the
//!    synchronous mutation, never across the advice call

use crate::config::{AppConfig, StorageBackend};
use crate::repositories::{FileSlot, MemorySlot, StateSlot};
use crate::services::{
    AdviceGateway, AdviceModel, Clock, GeminiClient, InsightBoard, StateStore, SystemClock,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    /// The dashboard's state store
    pub store: Arc<RwLock<StateStore>>,
    /// Coaching advice gateway
    pub advice: Arc<AdviceGateway>,
    /// Insight batch currently on display
    pub insights: Arc<RwLock<InsightBoard>>,
    /// Slot the store persists to, kept for readiness checks
    pub slot: Arc<dyn StateSlot>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl ServerState {
    /// Assemble state from explicit collaborators
    pub fn new(
        config: AppConfig,
        slot: Arc<dyn StateSlot>,
        clock: Arc<dyn Clock>,
        advice: AdviceGateway,
    ) -> Self {
        let store = StateStore::load(Arc::clone(&slot), clock);

        Self {
            store: Arc::new(RwLock::new(store)),
            advice: Arc::new(advice),
            insights: Arc::new(RwLock::new(InsightBoard::new())),
            slot,
            config: Arc::new(config),
        }
    }

    /// Wire up the slot, clock and advice model described by `config`
    pub fn from_config(config: AppConfig) -> Self {
        let slot: Arc<dyn StateSlot> = match config.storage.backend {
            StorageBackend::File => {
                let slot = FileSlot::new(&config.storage.dir, &config.storage.key);
                info!(path = %slot.path().display(), "Using file storage");
                Arc::new(slot)
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage, state will not survive restarts");
                Arc::new(MemorySlot::new())
            }
        };

        let advice = match GeminiClient::from_config(&config.ai) {
            Some(client) => {
                info!(model = %client.model(), "Coaching advice enabled");
                let model: Arc<dyn AdviceModel> = Arc::new(client);
                AdviceGateway::new(model, Duration::from_secs(config.ai.timeout_secs))
            }
            None => {
                info!("Coaching advice disabled, fallback insights will be served");
                AdviceGateway::disabled()
            }
        };

        Self::new(config, slot, Arc::new(SystemClock), advice)
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
