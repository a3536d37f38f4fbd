//! State store service
//!
//! Owns the `AppState` aggregate and is the only writer of it:
//! - Rehydrates from a key-value slot at start-up, falling back to seed data
//! - Applies mutations copy-on-write, swapping in a whole new aggregate
//! - Persists the full document after every mutation, off the request path
//!
//! Readers get `Arc<AppState>` snapshots, so a mutation never becomes
//! partially visible.

use crate::repositories::{SlotWriter, StateSlot};
use chrono::{DateTime, Local, NaiveDate, Utc};
use fitpulse_shared::models::{AppState, DailyStats, DailyStatsPatch, UserGoal, Workout};
use fitpulse_shared::seed::seed_state;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source of "now" and of the local calendar day
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The calendar day in the store's local time zone
    fn today(&self) -> NaiveDate;
}

/// Wall clock, local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
}

impl FixedClock {
    /// Pin to `now`, taking its UTC date as today
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            today: now.date_naive(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

/// The dashboard's state store
pub struct StateStore {
    state: Arc<AppState>,
    writer: SlotWriter,
    clock: Arc<dyn Clock>,
}

impl StateStore {
    /// Load the persisted state, or the seed state when it is absent or malformed
    ///
    /// Never fails: read and parse errors are logged and replaced by seed data.
    pub fn load(slot: Arc<dyn StateSlot>, clock: Arc<dyn Clock>) -> Self {
        let state = match slot.read() {
            Ok(Some(document)) => match serde_json::from_str::<AppState>(&document) {
                Ok(state) => {
                    info!(
                        workouts = state.workouts.len(),
                        daily_stats = state.daily_stats.len(),
                        "Loaded persisted state"
                    );
                    state
                }
                Err(e) => {
                    warn!(error = %e, "Persisted state is malformed, starting from seed data");
                    seed_state(clock.now(), clock.today())
                }
            },
            Ok(None) => {
                info!("No persisted state found, starting from seed data");
                seed_state(clock.now(), clock.today())
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted state, starting from seed data");
                seed_state(clock.now(), clock.today())
            }
        };

        Self {
            state: Arc::new(state),
            writer: SlotWriter::new(slot),
            clock,
        }
    }

    /// Current state snapshot
    #[inline]
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    #[inline]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Today's record, if one exists yet
    pub fn today_stats(&self) -> Option<DailyStats> {
        self.state.stats_for(self.clock.today()).cloned()
    }

    /// Prepend a workout. No deduplication, no range checks.
    pub fn add_workout(&mut self, workout: Workout) -> Arc<AppState> {
        debug!(id = %workout.id, activity = %workout.activity, "Adding workout");

        let mut next = AppState::clone(&self.state);
        next.workouts.insert(0, workout);
        self.commit(next)
    }

    /// Merge `patch` into today's record, creating it when missing
    ///
    /// A new record starts from zeros and carries forward the most recent
    /// recorded weight (70 kg when there is none).
    pub fn upsert_today_stats(&mut self, patch: &DailyStatsPatch) -> DailyStats {
        let today = self.clock.today();
        let mut next = AppState::clone(&self.state);

        let record = match next.daily_stats.iter().position(|s| s.date == today) {
            Some(idx) => {
                let merged = next.daily_stats[idx].merge(patch);
                next.daily_stats[idx] = merged.clone();
                merged
            }
            None => {
                let created = DailyStats::empty(today, next.latest_weight()).merge(patch);
                debug!(date = %today, weight = created.weight, "Creating daily stats record");
                next.daily_stats.insert(0, created.clone());
                created
            }
        };

        self.commit(next);
        record
    }

    /// Add `ml` to today's water intake
    pub fn add_water(&mut self, ml: u32) -> DailyStats {
        let current = self.today_stats().map(|s| s.water_intake).unwrap_or(0);
        self.upsert_today_stats(&DailyStatsPatch::water_intake(current.saturating_add(ml)))
    }

    /// Replace the goal wholesale
    pub fn update_goal(&mut self, goal: UserGoal) -> Arc<AppState> {
        let mut next = AppState::clone(&self.state);
        next.goal = goal;
        self.commit(next)
    }

    fn commit(&mut self, next: AppState) -> Arc<AppState> {
        self.state = Arc::new(next);
        self.persist();
        self.snapshot()
    }

    /// Handle to the background writer, for waiting on pending writes
    pub fn writer(&self) -> SlotWriter {
        self.writer.clone()
    }

    /// Queue the whole document for writing. Failures are logged, not returned.
    fn persist(&self) {
        match serde_json::to_string(self.state.as_ref()) {
            Ok(document) => self.writer.submit(document),
            Err(e) => warn!(error = %e, "Failed to serialize state, skipping persist"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemorySlot;
    use chrono::{Duration, TimeZone};
    use fitpulse_shared::errors::StorageError;
    use fitpulse_shared::models::{GoalType, Intensity, NewWorkout, DEFAULT_WEIGHT_KG};
    use proptest::prelude::*;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::at(Utc.with_ymd_and_hms(2025, 5, 10, 9, 30, 0).unwrap()))
    }

    fn empty_state() -> AppState {
        AppState {
            workouts: vec![],
            daily_stats: vec![],
            goal: UserGoal::default(),
        }
    }

    fn store_with(state: &AppState) -> (StateStore, MemorySlot) {
        let slot = MemorySlot::with_document(serde_json::to_string(state).unwrap());
        let store = StateStore::load(Arc::new(slot.clone()), clock());
        (store, slot)
    }

    struct BrokenSlot;

    impl StateSlot for BrokenSlot {
        fn read(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("offline".to_string()))
        }

        fn write(&self, _document: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_load_missing_document_gives_seed() {
        let clock = clock();
        let store = StateStore::load(Arc::new(MemorySlot::new()), clock.clone());

        let expected = seed_state(clock.now, clock.today);
        assert_eq!(*store.snapshot(), expected);
    }

    #[test]
    fn test_load_malformed_document_gives_seed() {
        let clock = clock();
        let slot = MemorySlot::with_document("{ not json");
        let store = StateStore::load(Arc::new(slot), clock.clone());

        assert_eq!(*store.snapshot(), seed_state(clock.now, clock.today));
    }

    #[test]
    fn test_load_unreadable_slot_gives_seed() {
        let store = StateStore::load(Arc::new(BrokenSlot), clock());
        assert_eq!(store.snapshot().workouts.len(), 2);
    }

    #[test]
    fn test_persist_failure_keeps_in_memory_mutation() {
        let mut store = StateStore::load(Arc::new(BrokenSlot), clock());
        let snapshot = store.update_goal(UserGoal {
            goal_type: GoalType::Endurance,
            ..UserGoal::default()
        });
        assert_eq!(snapshot.goal.goal_type, GoalType::Endurance);
    }

    #[test]
    fn test_add_workout_prepends_and_persists() {
        let (mut store, slot) = store_with(&empty_state());
        let c = clock();

        for (i, activity) in ["Running", "Yoga"].iter().enumerate() {
            let workout = NewWorkout {
                activity: activity.to_string(),
                duration: 30,
                intensity: Intensity::Low,
                calories_burned: None,
            }
            .into_workout(i.to_string(), c.now);
            store.add_workout(workout);
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.workouts[0].activity, "Yoga");
        assert_eq!(snapshot.workouts[1].activity, "Running");

        let persisted: AppState = serde_json::from_str(&slot.read().unwrap().unwrap()).unwrap();
        assert_eq!(persisted, *snapshot);
    }

    #[test]
    fn test_add_workout_does_not_deduplicate() {
        let (mut store, _) = store_with(&empty_state());
        let workout = seed_state(clock().now, clock().today).workouts[0].clone();

        store.add_workout(workout.clone());
        store.add_workout(workout);
        assert_eq!(store.snapshot().workouts.len(), 2);
    }

    #[test]
    fn test_snapshots_are_not_affected_by_later_mutations() {
        let (mut store, _) = store_with(&empty_state());
        let before = store.snapshot();

        store.upsert_today_stats(&DailyStatsPatch::steps(100));
        assert!(before.daily_stats.is_empty());
        assert_eq!(store.snapshot().daily_stats.len(), 1);
    }

    #[test]
    fn test_upsert_creates_record_with_default_weight() {
        let (mut store, _) = store_with(&empty_state());

        let record = store.upsert_today_stats(&DailyStatsPatch::steps(3000));
        assert_eq!(record.steps, 3000);
        assert_eq!(record.water_intake, 0);
        assert_eq!(record.calories_consumed, 0);
        assert_eq!(record.weight, DEFAULT_WEIGHT_KG);
        assert_eq!(record.date, clock().today);
    }

    #[test]
    fn test_upsert_carries_forward_previous_weight() {
        let c = clock();
        let mut state = empty_state();
        state.daily_stats.push(DailyStats {
            steps: 9000,
            water_intake: 1000,
            calories_consumed: 1900,
            weight: 82.4,
            date: c.today - Duration::days(1),
        });
        let (mut store, _) = store_with(&state);

        let record = store.upsert_today_stats(&DailyStatsPatch::water_intake(500));
        assert_eq!(record.weight, 82.4);
        assert_eq!(record.steps, 0);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.daily_stats.len(), 2);
        assert_eq!(snapshot.daily_stats[0].date, c.today);
    }

    #[test]
    fn test_upsert_explicit_weight_overrides_carry_forward() {
        let (mut store, _) = store_with(&seed_state(clock().now, clock().today - Duration::days(1)));
        let record = store.upsert_today_stats(&DailyStatsPatch::weight(74.1));
        assert_eq!(record.weight, 74.1);
    }

    #[test]
    fn test_upsert_merges_into_existing_record() {
        let c = clock();
        let (mut store, _) = store_with(&seed_state(c.now, c.today));

        let record = store.upsert_today_stats(&DailyStatsPatch::calories_consumed(2200));
        assert_eq!(record.calories_consumed, 2200);
        assert_eq!(record.steps, 8400);
        assert_eq!(record.weight, 75.0);
        assert_eq!(store.snapshot().daily_stats.len(), 2);
    }

    #[test]
    fn test_add_water_accumulates() {
        let c = clock();
        let (mut store, _) = store_with(&seed_state(c.now, c.today));

        store.add_water(250);
        let record = store.add_water(250);
        assert_eq!(record.water_intake, 2500);
    }

    #[test]
    fn test_update_goal_replaces_wholesale() {
        let (mut store, slot) = store_with(&empty_state());
        let goal = UserGoal {
            goal_type: GoalType::MuscleGain,
            target_weight: 85.0,
            target_steps: 6000,
            target_calories: 3000,
        };

        store.update_goal(goal.clone());
        assert_eq!(store.snapshot().goal, goal);

        let persisted: AppState = serde_json::from_str(&slot.read().unwrap().unwrap()).unwrap();
        assert_eq!(persisted.goal, goal);
    }

    #[test]
    fn test_persist_then_reload_round_trips() {
        let c = clock();
        let slot = MemorySlot::new();
        let mut store = StateStore::load(Arc::new(slot.clone()), c.clone());
        store.upsert_today_stats(&DailyStatsPatch::weight(74.6));
        store.add_workout(
            NewWorkout {
                activity: "HIIT".to_string(),
                duration: 25,
                intensity: Intensity::High,
                calories_burned: None,
            }
            .into_workout("hiit-1", c.now),
        );

        let reloaded = StateStore::load(Arc::new(slot), c);
        assert_eq!(*reloaded.snapshot(), *store.snapshot());
    }

    #[test]
    fn test_seed_then_log_cycling_workout() {
        let c = clock();
        let mut store = StateStore::load(Arc::new(MemorySlot::new()), c.clone());
        let before = store.snapshot().workouts.len();

        let workout = NewWorkout {
            activity: "Cycling".to_string(),
            duration: 40,
            intensity: Intensity::Moderate,
            calories_burned: Some(0),
        }
        .into_workout("cycling-1", c.now);
        let snapshot = store.add_workout(workout);

        assert_eq!(snapshot.workouts.len(), before + 1);
        assert_eq!(snapshot.workouts[0].id, "cycling-1");
        assert_eq!(snapshot.workouts[0].calories_burned, 200);
    }

    #[test]
    fn test_load_keeps_history_with_out_of_range_fields() {
        let blob = r#"{
            "workouts": [{"id":"row-1","type":"Rowing","duration":30,"intensity":"High","caloriesBurned":300,"date":"2025-05-09T07:00:00.000Z"}],
            "dailyStats": [{"steps":-200,"waterIntake":800,"caloriesConsumed":1200,"weight":81.3,"date":"2025-05-10"}],
            "goal": {"type":"muscle-gain","targetWeight":85,"targetSteps":null,"targetCalories":2800}
        }"#;
        let slot = MemorySlot::with_document(blob);
        let mut store = StateStore::load(Arc::new(slot.clone()), clock());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.workouts.len(), 1);
        assert_eq!(snapshot.workouts[0].activity, "Rowing");
        assert_eq!(snapshot.goal.goal_type, GoalType::MuscleGain);
        assert_eq!(snapshot.daily_stats[0].steps, 0);

        let record = store.add_water(250);
        assert_eq!(record.water_intake, 1050);
        assert_eq!(record.weight, 81.3);

        let persisted: AppState = serde_json::from_str(&slot.read().unwrap().unwrap()).unwrap();
        assert_eq!(persisted.workouts[0].id, "row-1");
        assert_eq!(persisted.goal.goal_type, GoalType::MuscleGain);
        assert_eq!(persisted.goal.target_calories, 2800);
    }

    #[tokio::test]
    async fn test_mutations_persist_in_background() {
        let c = clock();
        let slot = MemorySlot::new();
        let mut store = StateStore::load(Arc::new(slot.clone()), c.clone());

        for steps in [1000, 2000, 3000] {
            store.upsert_today_stats(&DailyStatsPatch::steps(steps));
        }
        store.writer().flush().await;

        let persisted: AppState = serde_json::from_str(&slot.read().unwrap().unwrap()).unwrap();
        assert_eq!(persisted, *store.snapshot());
        assert_eq!(persisted.daily_stats[0].steps, 3000);
    }

    fn patch_strategy() -> impl Strategy<Value = DailyStatsPatch> {
        (
            proptest::option::of(0u32..50_000),
            proptest::option::of(0u32..5_000),
            proptest::option::of(0u32..6_000),
            proptest::option::of(30.0f64..200.0),
        )
            .prop_map(|(steps, water_intake, calories_consumed, weight)| DailyStatsPatch {
                steps,
                water_intake,
                calories_consumed,
                weight,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Repeated upserts on one day leave one record holding the last value per field
        #[test]
        fn prop_upserts_merge_per_field(
            prior_weight in 30.0f64..200.0,
            patches in proptest::collection::vec(patch_strategy(), 1..20)
        ) {
            let c = clock();
            let mut state = empty_state();
            state.daily_stats.push(DailyStats::empty(c.today - Duration::days(1), prior_weight));
            let (mut store, _) = store_with(&state);

            for patch in &patches {
                store.upsert_today_stats(patch);
            }

            let snapshot = store.snapshot();
            let todays: Vec<_> = snapshot.daily_stats.iter().filter(|s| s.date == c.today).collect();
            prop_assert_eq!(todays.len(), 1);

            let record = todays[0];
            let last = |f: fn(&DailyStatsPatch) -> Option<u32>| patches.iter().rev().find_map(f).unwrap_or(0);
            prop_assert_eq!(record.steps, last(|p| p.steps));
            prop_assert_eq!(record.water_intake, last(|p| p.water_intake));
            prop_assert_eq!(record.calories_consumed, last(|p| p.calories_consumed));

            let expected_weight = patches.iter().rev().find_map(|p| p.weight).unwrap_or(prior_weight);
            prop_assert_eq!(record.weight, expected_weight);
        }
    }
}
