//! Coaching advice service
//!
//! Turns a state snapshot into a prompt, asks the generative model for
//! insights and parses the reply. Every failure (disabled service, network,
//! API error, timeout, malformed reply) degrades to a single generic
//! insight; callers always get a batch back.

use async_trait::async_trait;
use fitpulse_shared::errors::AdviceError;
use fitpulse_shared::models::{AppState, Insight, InsightBatch};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Workouts included in the prompt
const PROMPT_WORKOUTS: usize = 5;

/// Daily stat records included in the prompt
const PROMPT_DAILY_STATS: usize = 7;

/// Default bound on a single advice call
pub const DEFAULT_ADVICE_TIMEOUT: Duration = Duration::from_secs(30);

/// A generative model that answers a prompt with JSON text
#[async_trait]
pub trait AdviceModel: Send + Sync {
    /// Send `prompt` and return the raw reply text
    async fn generate(&self, prompt: &str) -> Result<String, AdviceError>;
}

/// Advice gateway
pub struct AdviceGateway {
    model: Option<Arc<dyn AdviceModel>>,
    timeout: Duration,
    sequence: AtomicU64,
}

impl AdviceGateway {
    pub fn new(model: Arc<dyn AdviceModel>, timeout: Duration) -> Self {
        Self {
            model: Some(model),
            timeout,
            sequence: AtomicU64::new(0),
        }
    }

    /// A gateway that always answers with the fallback insight
    pub fn disabled() -> Self {
        Self {
            model: None,
            timeout: DEFAULT_ADVICE_TIMEOUT,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    /// Ask for insights about `state`. Never fails.
    ///
    /// Each call is stamped with a sequence number in issue order.
    pub async fn fetch_insights(&self, state: &AppState) -> InsightBatch {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        match self.try_fetch(state).await {
            Ok(insights) => {
                info!(sequence, count = insights.len(), "Received coaching insights");
                InsightBatch::from_service(insights, sequence)
            }
            Err(AdviceError::Disabled) => {
                debug!(sequence, "Advice service disabled, using fallback insight");
                InsightBatch::fallback(sequence)
            }
            Err(e) => {
                warn!(sequence, error = %e, "Advice service failed, using fallback insight");
                InsightBatch::fallback(sequence)
            }
        }
    }

    async fn try_fetch(&self, state: &AppState) -> Result<Vec<Insight>, AdviceError> {
        let model = self.model.as_ref().ok_or(AdviceError::Disabled)?;
        let prompt = build_prompt(state);

        let reply = tokio::time::timeout(self.timeout, model.generate(&prompt))
            .await
            .map_err(|_| AdviceError::Timeout(self.timeout.as_secs()))??;

        parse_insights(&reply)
    }
}

/// Build the coaching prompt from the goal, recent workouts and recent stats
pub fn build_prompt(state: &AppState) -> String {
    let goal = &state.goal;
    let workouts = to_json(&state.workouts.iter().take(PROMPT_WORKOUTS).collect::<Vec<_>>());
    let daily_stats = to_json(
        &state
            .daily_stats
            .iter()
            .take(PROMPT_DAILY_STATS)
            .collect::<Vec<_>>(),
    );

    format!(
        "As a professional fitness and nutrition coach, analyze the following user fitness data \
         and provide 3 concise, actionable insights.\n\
         \n\
         Goal: {goal_type} (Target Weight: {weight}kg, Target Steps: {steps}, Target Calories: {calories}kcal)\n\
         Recent Workouts: {workouts}\n\
         Daily Progress: {daily_stats}\n\
         \n\
         Format the response as a valid JSON array of objects with 'title', 'advice', and \
         'priority' (High, Medium, Low).\n\
         Do not include markdown markers like ```json.",
        goal_type = goal.goal_type,
        weight = goal.target_weight,
        steps = goal.target_steps,
        calories = goal.target_calories,
    )
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

/// Parse the model's reply into insights
///
/// Tolerates surrounding whitespace and a markdown code fence. An empty
/// array counts as a failure so that the caller always shows something.
pub fn parse_insights(raw: &str) -> Result<Vec<Insight>, AdviceError> {
    let body = strip_code_fence(raw.trim());
    let insights: Vec<Insight> =
        serde_json::from_str(body).map_err(|e| AdviceError::Parse(e.to_string()))?;

    if insights.is_empty() {
        return Err(AdviceError::Parse("reply contained no insights".to_string()));
    }

    Ok(insights)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") up to the first newline
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// The insight batch currently on display
///
/// Overlapping fetches may resolve out of order; a batch is only shown when
/// it was issued after the one already displayed.
#[derive(Debug, Default)]
pub struct InsightBoard {
    current: Option<InsightBatch>,
}

impl InsightBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `batch` unless a later-issued batch is already on display
    ///
    /// Returns whether the batch was accepted.
    pub fn publish(&mut self, batch: InsightBatch) -> bool {
        if let Some(current) = &self.current {
            if current.sequence >= batch.sequence {
                debug!(
                    displayed = current.sequence,
                    stale = batch.sequence,
                    "Discarding stale insight batch"
                );
                return false;
            }
        }
        self.current = Some(batch);
        true
    }

    pub fn current(&self) -> Option<&InsightBatch> {
        self.current.as_ref()
    }
}
