//! Data models for the FitPulse dashboard
//!
//! Field names serialize in camelCase so that the persisted document keeps the
//! same shape as the `fitpulse_data` blob written by the browser dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coerce;
use crate::metrics::estimate_calories;

/// Weight assumed for a brand new daily record when no earlier record exists
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

/// Suggested activity labels offered by the workout form
pub const EXERCISE_TYPES: &[&str] = &[
    "Running",
    "Cycling",
    "Swimming",
    "Walking",
    "Weightlifting",
    "Yoga",
    "HIIT",
    "Pilates",
    "Other",
];

// ============================================================================
// Workouts
// ============================================================================

/// Workout intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Intensity {
    Low,
    #[default]
    Moderate,
    High,
}

impl Intensity {
    /// Calories burned per minute at this intensity
    pub fn calorie_rate(&self) -> u32 {
        match self {
            Intensity::Low => 3,
            Intensity::Moderate => 5,
            Intensity::High => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "Low",
            Intensity::Moderate => "Moderate",
            Intensity::High => "High",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Intensity::Low),
            "moderate" | "medium" => Ok(Intensity::Moderate),
            "high" => Ok(Intensity::High),
            _ => Err(format!("Unknown intensity: {}", s)),
        }
    }
}

/// A logged exercise session
///
/// Workouts are immutable once logged and are kept newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    #[serde(rename = "type")]
    pub activity: String,
    /// Duration in minutes
    #[serde(default, deserialize_with = "coerce::count")]
    pub duration: u32,
    pub intensity: Intensity,
    #[serde(default, deserialize_with = "coerce::count")]
    pub calories_burned: u32,
    pub date: DateTime<Utc>,
}

/// A workout as entered in the logging form, before an id and timestamp exist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkout {
    #[serde(rename = "type")]
    pub activity: String,
    pub duration: u32,
    #[serde(default)]
    pub intensity: Intensity,
    /// Left blank or zero to have it estimated from duration and intensity
    #[serde(default)]
    pub calories_burned: Option<u32>,
}

impl NewWorkout {
    /// Turn the form input into a workout, estimating calories when none were given
    pub fn into_workout(self, id: impl Into<String>, logged_at: DateTime<Utc>) -> Workout {
        let calories_burned = match self.calories_burned {
            Some(kcal) if kcal > 0 => kcal,
            _ => estimate_calories(self.duration, self.intensity),
        };

        Workout {
            id: id.into(),
            activity: self.activity,
            duration: self.duration,
            intensity: self.intensity,
            calories_burned,
            date: logged_at,
        }
    }
}

// ============================================================================
// Daily stats
// ============================================================================

/// Health metrics for a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    #[serde(default, deserialize_with = "coerce::count")]
    pub steps: u32,
    /// Water intake in ml
    #[serde(default, deserialize_with = "coerce::count")]
    pub water_intake: u32,
    #[serde(default, deserialize_with = "coerce::count")]
    pub calories_consumed: u32,
    /// Body weight in kg
    #[serde(default, deserialize_with = "coerce::measure")]
    pub weight: f64,
    /// Calendar day, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
}

impl DailyStats {
    /// An empty record for `date` carrying `weight` forward
    pub fn empty(date: NaiveDate, weight: f64) -> Self {
        Self {
            steps: 0,
            water_intake: 0,
            calories_consumed: 0,
            weight,
            date,
        }
    }

    /// Overlay the supplied fields of `patch` onto this record
    pub fn merge(&self, patch: &DailyStatsPatch) -> Self {
        Self {
            steps: patch.steps.unwrap_or(self.steps),
            water_intake: patch.water_intake.unwrap_or(self.water_intake),
            calories_consumed: patch.calories_consumed.unwrap_or(self.calories_consumed),
            weight: patch.weight.unwrap_or(self.weight),
            date: self.date,
        }
    }
}

/// Partial update for today's stats. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_intake: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_consumed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl DailyStatsPatch {
    pub fn steps(steps: u32) -> Self {
        Self {
            steps: Some(steps),
            ..Self::default()
        }
    }

    pub fn water_intake(ml: u32) -> Self {
        Self {
            water_intake: Some(ml),
            ..Self::default()
        }
    }

    pub fn calories_consumed(kcal: u32) -> Self {
        Self {
            calories_consumed: Some(kcal),
            ..Self::default()
        }
    }

    pub fn weight(kg: f64) -> Self {
        Self {
            weight: Some(kg),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_none()
            && self.water_intake.is_none()
            && self.calories_consumed.is_none()
            && self.weight.is_none()
    }
}

// ============================================================================
// Goal
// ============================================================================

/// Goal category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GoalType {
    #[default]
    WeightLoss,
    MuscleGain,
    Endurance,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::WeightLoss => "weight-loss",
            GoalType::MuscleGain => "muscle-gain",
            GoalType::Endurance => "endurance",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's single active goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGoal {
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    /// Target body weight in kg
    #[serde(default, deserialize_with = "coerce::measure")]
    pub target_weight: f64,
    #[serde(default, deserialize_with = "coerce::count")]
    pub target_steps: u32,
    #[serde(default, deserialize_with = "coerce::count")]
    pub target_calories: u32,
}

impl Default for UserGoal {
    fn default() -> Self {
        Self {
            goal_type: GoalType::WeightLoss,
            target_weight: 70.0,
            target_steps: 10_000,
            target_calories: 2000,
        }
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Everything the dashboard tracks. Persisted as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Newest first
    #[serde(default)]
    pub workouts: Vec<Workout>,
    /// Newest first, at most one record per date
    #[serde(default)]
    pub daily_stats: Vec<DailyStats>,
    #[serde(default)]
    pub goal: UserGoal,
}

impl AppState {
    /// Stats recorded for `date`, if any
    pub fn stats_for(&self, date: NaiveDate) -> Option<&DailyStats> {
        self.daily_stats.iter().find(|s| s.date == date)
    }

    /// Most recently recorded weight, or the default when nothing usable is recorded
    pub fn latest_weight(&self) -> f64 {
        self.daily_stats
            .first()
            .map(|s| s.weight)
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_WEIGHT_KG)
    }
}

// ============================================================================
// Insights
// ============================================================================

/// Insight priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A single piece of coaching advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub advice: String,
    pub priority: Priority,
}

impl Insight {
    /// Generic advice shown whenever the coaching service cannot be used
    pub fn fallback() -> Self {
        Self {
            title: "Keep it up!".to_string(),
            advice: "Consistency is key. Try to hit your step goal daily.".to_string(),
            priority: Priority::Medium,
        }
    }
}

/// Where an insight batch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSource {
    Service,
    Fallback,
}

/// The result of one advice fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightBatch {
    pub insights: Vec<Insight>,
    pub source: InsightSource,
    /// Issue order of the fetch that produced this batch
    pub sequence: u64,
}

impl InsightBatch {
    pub fn from_service(insights: Vec<Insight>, sequence: u64) -> Self {
        Self {
            insights,
            source: InsightSource::Service,
            sequence,
        }
    }

    pub fn fallback(sequence: u64) -> Self {
        Self {
            insights: vec![Insight::fallback()],
            source: InsightSource::Fallback,
            sequence,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == InsightSource::Fallback
    }
}
