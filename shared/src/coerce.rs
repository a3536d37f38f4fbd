//! Field-level coercion for persisted documents
//!
//! Older dashboards stored whatever the number inputs produced: negative
//! counts, fractions, and `null` where a field was left blank. These
//! deserializers map such values onto the model's types so one odd field
//! never costs the rest of the document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Non-negative whole number. Negative, blank and non-numeric values become 0,
/// fractions are rounded and overflow saturates.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number).map(to_count).unwrap_or(0))
}

/// Non-negative measurement such as a weight in kg. Blank or invalid is 0.
pub fn measure<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number)
        .filter(|x| x.is_finite())
        .map(|x| x.max(0.0))
        .unwrap_or(0.0))
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_count(x: f64) -> u32 {
    if !x.is_finite() || x <= 0.0 {
        0
    } else if x >= u32::MAX as f64 {
        u32::MAX
    } else {
        x.round() as u32
    }
}
