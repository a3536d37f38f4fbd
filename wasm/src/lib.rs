//! FitPulse WASM Module
//!
//! Exposes the dashboard's derived metrics to the browser so the page can
//! recompute progress cards and trend charts without a round trip.
//! Structured values cross the boundary as JSON strings.

use fitpulse_shared::metrics::{self, DashboardSummary};
use fitpulse_shared::models::{AppState, DailyStats, Intensity};
use wasm_bindgen::prelude::*;

/// Progress towards a target as a percentage in [0, 100]
#[wasm_bindgen]
pub fn progress_ratio(current: f64, target: f64) -> f64 {
    metrics::progress_ratio(current, target)
}

/// Calories burned for `duration_minutes` at `intensity`
///
/// Unknown intensity names are treated as Moderate.
#[wasm_bindgen]
pub fn estimate_calories(duration_minutes: u32, intensity: &str) -> u32 {
    let intensity = intensity.parse::<Intensity>().unwrap_or_default();
    metrics::estimate_calories(duration_minutes, intensity)
}

/// Chronological 7-day window from a newest-first JSON array of daily stats
#[wasm_bindgen]
pub fn weekly_trend(daily_stats_json: &str) -> Result<String, JsValue> {
    trend_json(daily_stats_json).map_err(|e| JsValue::from_str(&e))
}

/// Dashboard summary for a full state document
#[wasm_bindgen]
pub fn dashboard_summary(state_json: &str) -> Result<String, JsValue> {
    summary_json(state_json).map_err(|e| JsValue::from_str(&e))
}

fn trend_json(daily_stats_json: &str) -> Result<String, String> {
    let stats: Vec<DailyStats> =
        serde_json::from_str(daily_stats_json).map_err(|e| format!("Invalid daily stats: {}", e))?;
    serde_json::to_string(&metrics::weekly_trend(&stats)).map_err(|e| e.to_string())
}

fn summary_json(state_json: &str) -> Result<String, String> {
    let state: AppState =
        serde_json::from_str(state_json).map_err(|e| format!("Invalid state document: {}", e))?;
    serde_json::to_string(&DashboardSummary::from_state(&state)).map_err(|e| e.to_string())
}
