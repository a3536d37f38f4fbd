//! FitPulse Shared Library
//!
//! This crate contains the data model, derived metrics and seed data used
//! across the backend and WASM modules.

pub mod coerce;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod seed;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use metrics::*;
pub use models::*;
pub use seed::seed_state;
