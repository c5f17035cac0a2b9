pub mod legacy;
pub mod model;

pub use legacy::{LegacyProgress, LegacyStats};
pub use model::{ProgressState, StageRecord, CURRENT_SCHEMA_VERSION};

/// Storage key of the current progress record.
pub const PROGRESS_KEY: &str = "timerGameData";
/// v1 aggregate stats.
pub const LEGACY_STATS_KEY: &str = "timerGameStats";
/// v1 cleared-stage list.
pub const LEGACY_PROGRESS_KEY: &str = "timerGameProgress";
/// Selected cosmetic skin id.
pub const SKIN_KEY: &str = "timerGameSkin";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stage_schema::MissionId;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_progress_serialization() {
        let mut state = ProgressState::new();
        state.stages.insert(
            4,
            StageRecord {
                attempts: 3,
                successes: 1,
                failures: 2,
                best_diff: Some(0.02),
                failures_before_success: 2,
            },
        );
        state.total_plays = 3;
        state.perfect_count = 1;
        state.current_combo = 1;
        state.max_combo = 1;
        state.perfect_combo = 0;
        state.max_perfect_combo = 2;
        state.daily_plays.insert(day("2026-03-14"), 3);
        state.max_daily_plays = 3;
        state.lucky_achieved = true;
        state.first_try_achieved = true;
        state.completed_missions = vec![MissionId::Number(1), MissionId::from("lucky")];

        let json = serde_json::to_string(&state).expect("Failed to serialize progress");
        let back: ProgressState = serde_json::from_str(&json).expect("Failed to deserialize progress");

        assert_eq!(back, state);
    }

    #[test]
    fn source_keys_are_camel_case() {
        let mut state = ProgressState::new();
        state.daily_plays.insert(day("2026-01-02"), 7);
        state.stages.insert(1, StageRecord::default());

        let v = serde_json::to_value(&state).unwrap();
        assert_eq!(v["totalPlays"], 0);
        assert_eq!(v["maxPerfectCombo"], 0);
        assert_eq!(v["dailyPlays"]["2026-01-02"], 7);
        assert!(v["stages"]["1"]["bestDiff"].is_null());
        assert_eq!(v["stages"]["1"]["failuresBeforeSuccess"], 0);
        assert!(v.get("legacyCleared").is_none());
    }

    #[test]
    fn missing_fields_take_defaults() {
        // Shape written before streaks, daily counters and flags existed.
        let v = serde_json::json!({
            "stages": { "2": { "attempts": 1, "successes": 1, "bestDiff": 0.004 } },
            "totalPlays": 1,
            "completedMissions": [3]
        });
        let state: ProgressState = serde_json::from_value(v).unwrap();

        assert_eq!(state.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(state.total_plays, 1);
        assert_eq!(state.max_perfect_combo, 0);
        assert!(state.daily_plays.is_empty());
        assert!(!state.lucky_achieved);
        assert!(state.is_cleared(2));
        assert_eq!(state.stage(2).map(|r| r.failures), Some(0));
        assert!(state.has_completed(&MissionId::Number(3)));
    }

    #[test]
    fn legacy_pair_upgrades_into_current_shape() {
        let stats: LegacyStats = serde_json::from_value(serde_json::json!({
            "totalPlays": 12,
            "perfectCount": 2,
            "currentCombo": 1,
            "maxCombo": 4,
            "completedMissions": ["first", "first"]
        }))
        .unwrap();
        let progress: LegacyProgress =
            serde_json::from_value(serde_json::json!({ "cleared": [1, 2, 3] })).unwrap();

        let state = stats.upgrade(progress);

        assert_eq!(state.total_plays, 12);
        assert_eq!(state.perfect_count, 2);
        assert_eq!(state.max_combo, 4);
        assert_eq!(state.completed_missions, vec![MissionId::from("first")]);
        assert!(state.stages.is_empty());
        assert_eq!(state.cleared_count(), 3);
        assert!(state.is_cleared(2));
        assert_eq!(state.best_diff(2), None);
    }

    #[test]
    fn mark_completed_is_monotonic() {
        let mut state = ProgressState::new();
        assert!(state.mark_completed(MissionId::Number(5)));
        assert!(!state.mark_completed(MissionId::Number(5)));
        assert_eq!(state.completed_missions.len(), 1);
    }
}
