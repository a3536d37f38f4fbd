//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the persistence slot and external systems.

pub mod advice;
pub mod gemini;
pub mod store;

pub use advice::{AdviceGateway, AdviceModel, InsightBoard};
pub use gemini::GeminiClient;
pub use store::{Clock, FixedClock, StateStore, SystemClock};
