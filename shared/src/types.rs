//! API request and response types

use serde::{Deserialize, Serialize};

use crate::models::NewWorkout;

/// Log workout request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogWorkoutRequest {
    /// Caller-chosen id; generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub workout: NewWorkout,
}

/// Quick water entry request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWaterRequest {
    #[serde(default = "default_water_ml")]
    pub amount_ml: u32,
}

/// One glass, as added by the dashboard's water card
pub const DEFAULT_WATER_ML: u32 = 250;

fn default_water_ml() -> u32 {
    DEFAULT_WATER_ML
}

impl Default for AddWaterRequest {
    fn default() -> Self {
        Self {
            amount_ml: DEFAULT_WATER_ML,
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
