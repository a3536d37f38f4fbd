//! Input parsing for the quick-entry stat prompts
//!
//! Invalid numeric input never becomes an error: it simply produces no update.

use serde::{Deserialize, Serialize};

use crate::models::DailyStatsPatch;

/// Parse a non-negative whole number such as a step count
pub fn parse_count(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Parse a body weight in kg, rounded to one decimal place
pub fn parse_weight(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * 10.0).round() / 10.0)
}

/// A daily stat that can be entered on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatField {
    Steps,
    Water,
    Calories,
    Weight,
}

impl StatField {
    /// Turn raw user input into a patch, or `None` when it is not a valid number
    pub fn parse_entry(&self, raw: &str) -> Option<DailyStatsPatch> {
        match self {
            StatField::Steps => parse_count(raw).map(DailyStatsPatch::steps),
            StatField::Water => parse_count(raw).map(DailyStatsPatch::water_intake),
            StatField::Calories => parse_count(raw).map(DailyStatsPatch::calories_consumed),
            StatField::Weight => parse_weight(raw).map(DailyStatsPatch::weight),
        }
    }
}

impl std::str::FromStr for StatField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "steps" => Ok(StatField::Steps),
            "water" | "water_intake" | "waterintake" => Ok(StatField::Water),
            "calories" | "calories_consumed" | "caloriesconsumed" => Ok(StatField::Calories),
            "weight" => Ok(StatField::Weight),
            _ => Err(format!("Unknown stat field: {}", s)),
        }
    }
}
