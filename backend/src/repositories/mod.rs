//! Persistence slots
//!
//! Provides the durable key-value slot the state document lives in.

pub mod slot;
pub mod writer;

pub use slot::{FileSlot, MemorySlot, StateSlot};
pub use writer::SlotWriter;
