//! Sample data used on first launch, before anything has been persisted

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{AppState, DailyStats, Intensity, UserGoal, Workout};

/// Build the seed state relative to `now` and the local calendar day `today`
pub fn seed_state(now: DateTime<Utc>, today: NaiveDate) -> AppState {
    let yesterday = today - Duration::days(1);

    AppState {
        workouts: vec![
            Workout {
                id: "1".to_string(),
                activity: "Running".to_string(),
                duration: 30,
                intensity: Intensity::High,
                calories_burned: 350,
                date: now,
            },
            Workout {
                id: "2".to_string(),
                activity: "Yoga".to_string(),
                duration: 45,
                intensity: Intensity::Low,
                calories_burned: 150,
                date: now - Duration::days(1),
            },
        ],
        daily_stats: vec![
            DailyStats {
                steps: 8400,
                water_intake: 2000,
                calories_consumed: 1800,
                weight: 75.0,
                date: today,
            },
            DailyStats {
                steps: 6200,
                water_intake: 1500,
                calories_consumed: 2100,
                weight: 75.2,
                date: yesterday,
            },
        ],
        goal: UserGoal::default(),
    }
}
