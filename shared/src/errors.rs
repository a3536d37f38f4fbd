//! Error types for the FitPulse application
//!
//! None of these reach the dashboard: the store and the advice gateway turn
//! every one of them into a default value and a log line.

use thiserror::Error;

/// Key-value slot errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Coaching service errors
#[derive(Error, Debug)]
pub enum AdviceError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Service error: {0}")]
    Api(String),

    #[error("No content in service response")]
    EmptyResponse,

    #[error("Service did not answer within {0} seconds")]
    Timeout(u64),

    #[error("Could not parse insights: {0}")]
    Parse(String),

    #[error("Advice service is disabled")]
    Disabled,
}
