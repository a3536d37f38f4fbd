//! Derived metrics module
//!
//! Progress ratios, the 7-day trend window and calorie estimation, computed
//! from a state snapshot on every read.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Total**: Every input yields a finite result, never NaN or infinity

use serde::{Deserialize, Serialize};

use crate::models::{AppState, DailyStats, Intensity, Workout};

/// Number of days shown in the trend charts
pub const TREND_WINDOW_DAYS: usize = 7;

/// Daily water intake the dashboard measures against, in ml
pub const DAILY_WATER_TARGET_ML: u32 = 3000;

/// Number of workouts listed under "Recent Activities"
pub const RECENT_WORKOUTS: usize = 3;

// ============================================================================
// Core calculations
// ============================================================================

/// Progress towards a target as a percentage
///
/// Formula: min(current / target, 1.0) * 100, clamped to [0, 100].
/// A zero, negative or non-finite target counts as no progress.
pub fn progress_ratio(current: f64, target: f64) -> f64 {
    if !target.is_finite() || target <= 0.0 || !current.is_finite() {
        return 0.0;
    }

    ((current / target).min(1.0) * 100.0).clamp(0.0, 100.0)
}

/// The most recent week of stats in chronological order
///
/// Expects `daily_stats` newest first, as stored.
pub fn weekly_trend(daily_stats: &[DailyStats]) -> Vec<DailyStats> {
    daily_stats
        .iter()
        .take(TREND_WINDOW_DAYS)
        .rev()
        .cloned()
        .collect()
}

/// Estimate calories burned from duration and intensity
///
/// Formula: duration(min) * rate, with rate 10 (High), 5 (Moderate), 3 (Low)
pub fn estimate_calories(duration_minutes: u32, intensity: Intensity) -> u32 {
    duration_minutes.saturating_mul(intensity.calorie_rate())
}

// ============================================================================
// Dashboard summary
// ============================================================================

/// A progress reading for one stat card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current: f64,
    pub target: f64,
    pub percent: f64,
}

impl Progress {
    pub fn new(current: f64, target: f64) -> Self {
        Self {
            current,
            target,
            percent: progress_ratio(current, target),
        }
    }
}

/// Everything the dashboard screen renders, derived from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// The newest stats record, or zeros when nothing is recorded
    pub today: DailyStats,
    pub steps: Progress,
    pub calories: Progress,
    pub water: Progress,
    pub recent_workouts: Vec<Workout>,
    pub trend: Vec<DailyStats>,
}

impl DashboardSummary {
    pub fn from_state(state: &AppState) -> Self {
        let today = state.daily_stats.first().cloned().unwrap_or(DailyStats {
            steps: 0,
            water_intake: 0,
            calories_consumed: 0,
            weight: 0.0,
            date: chrono::NaiveDate::default(),
        });

        Self {
            steps: Progress::new(today.steps as f64, state.goal.target_steps as f64),
            calories: Progress::new(
                today.calories_consumed as f64,
                state.goal.target_calories as f64,
            ),
            water: Progress::new(today.water_intake as f64, DAILY_WATER_TARGET_ML as f64),
            recent_workouts: state.workouts.iter().take(RECENT_WORKOUTS).cloned().collect(),
            trend: weekly_trend(&state.daily_stats),
            today,
        }
    }
}
