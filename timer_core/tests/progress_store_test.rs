use chrono::NaiveDate;
use progress_data::ProgressState;
use stage_schema::{MissionCatalog, MissionId, StageCatalog};
use timer_core::mission::MissionEngine;
use timer_core::progress::{
    apply_attempt, AttemptRecord, FileStorage, MemoryStorage, ProgressStore, Storage, StorageError,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn hit(stage_id: u32, diff: f64) -> AttemptRecord {
    AttemptRecord {
        stage_id,
        success: true,
        diff,
        stopped_time: Some(5.0 + diff),
    }
}

fn miss(stage_id: u32, diff: f64) -> AttemptRecord {
    AttemptRecord {
        stage_id,
        success: false,
        diff,
        stopped_time: Some(5.0 + diff),
    }
}

fn stages() -> StageCatalog {
    StageCatalog::from_json_str(
        r#"[
            {"id": 1, "group": 1, "target": 5, "margin": 0.1},
            {"id": 2, "group": 1, "target": 5, "margin": 0.1}
        ]"#,
    )
    .unwrap()
}

fn missions() -> MissionCatalog {
    MissionCatalog::from_json_str(
        r#"[
            {"id": 1, "type": "play_count", "target": 1},
            {"id": 2, "type": "play_count", "target": 3}
        ]"#,
    )
    .unwrap()
}

/// Reads succeed with nothing stored; every write fails.
struct ReadOnlyStorage;

impl Storage for ReadOnlyStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn write(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Write {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "quota exceeded"),
        })
    }
}

#[test]
fn test_stage_record_counts() {
    let mut state = ProgressState::new();
    apply_attempt(&mut state, &miss(1, 0.5), day(1));
    apply_attempt(&mut state, &miss(1, 0.4), day(1));
    apply_attempt(&mut state, &hit(1, 0.3), day(1));
    apply_attempt(&mut state, &miss(1, 0.2), day(1));
    apply_attempt(&mut state, &hit(1, 0.1), day(1));
    apply_attempt(&mut state, &hit(1, 0.2), day(1));

    let record = state.stage(1).unwrap();
    assert_eq!(record.attempts, 6);
    assert_eq!(record.successes, 3);
    assert_eq!(record.failures, 3);
    assert_eq!(record.attempts, record.successes + record.failures);
    assert_eq!(record.best_diff, Some(0.1));
    // Only the two failures before the first clear count
    assert_eq!(record.failures_before_success, 2);
    assert!(state.is_cleared(1));
    assert!(!state.is_cleared(2));
}

#[test]
fn test_failures_never_set_best_diff() {
    let mut state = ProgressState::new();
    apply_attempt(&mut state, &miss(2, 0.001), day(1));
    let record = state.stage(2).unwrap();
    assert_eq!(record.best_diff, None);
    assert!(!record.is_cleared());
}

#[test]
fn test_combo_resets_on_failure() {
    let mut state = ProgressState::new();
    apply_attempt(&mut state, &hit(1, 0.05), day(1));
    apply_attempt(&mut state, &hit(2, 0.05), day(1));
    assert_eq!(state.current_combo, 2);

    apply_attempt(&mut state, &miss(1, 0.5), day(1));
    assert_eq!(state.current_combo, 0);
    assert_eq!(state.max_combo, 2);

    apply_attempt(&mut state, &hit(1, 0.05), day(1));
    assert_eq!(state.current_combo, 1);
    assert_eq!(state.max_combo, 2);
}

#[test]
fn test_perfect_threshold_is_ten_milliseconds() {
    let mut state = ProgressState::new();
    apply_attempt(&mut state, &hit(1, 0.01), day(1));
    assert_eq!(state.perfect_count, 1);
    assert_eq!(state.perfect_combo, 1);

    apply_attempt(&mut state, &hit(1, 0.011), day(1));
    assert_eq!(state.perfect_count, 1);
    assert_eq!(state.perfect_combo, 0);
    assert_eq!(state.max_perfect_combo, 1);
    assert_eq!(state.current_combo, 2);
}

#[test]
fn test_zero_diff_flag() {
    let mut state = ProgressState::new();
    apply_attempt(&mut state, &hit(1, 0.001), day(1));
    assert!(!state.zero_diff_achieved);
    apply_attempt(&mut state, &hit(1, 0.0), day(1));
    assert!(state.zero_diff_achieved);
}

#[test]
fn test_first_try_needs_first_attempt_within_fifty_ms() {
    let mut state = ProgressState::new();
    apply_attempt(&mut state, &hit(1, 0.051), day(1));
    assert!(!state.first_try_achieved);

    // Second attempt on the stage does not qualify however close
    apply_attempt(&mut state, &hit(1, 0.0), day(1));
    assert!(!state.first_try_achieved);

    apply_attempt(&mut state, &hit(2, 0.05), day(1));
    assert!(state.first_try_achieved);
}

#[test]
fn test_first_try_is_lost_after_an_opening_failure() {
    let mut state = ProgressState::new();
    apply_attempt(&mut state, &miss(3, 1.0), day(1));
    apply_attempt(&mut state, &hit(3, 0.05), day(1));

    assert!(!state.first_try_achieved);
    assert_eq!(state.stage(3).map(|r| r.failures_before_success), Some(1));
}

#[test]
fn test_failure_on_legacy_cleared_stage_is_not_before_success() {
    let mut state = ProgressState::new();
    state.legacy_cleared.insert(2);
    apply_attempt(&mut state, &miss(2, 0.5), day(1));

    let record = state.stage(2).unwrap();
    assert_eq!(record.failures, 1);
    assert_eq!(record.failures_before_success, 0);
}

#[test]
fn test_lucky_stop_counts_even_on_failure() {
    let mut state = ProgressState::new();
    let attempt = AttemptRecord {
        stage_id: 1,
        success: false,
        diff: 2.777,
        stopped_time: Some(7.777),
    };
    apply_attempt(&mut state, &attempt, day(1));
    assert!(state.lucky_achieved);
}

#[test]
fn test_daily_plays_track_the_busiest_day() {
    let mut state = ProgressState::new();
    for _ in 0..3 {
        apply_attempt(&mut state, &miss(1, 1.0), day(1));
    }
    apply_attempt(&mut state, &hit(1, 0.05), day(2));

    assert_eq!(state.plays_on(day(1)), 3);
    assert_eq!(state.plays_on(day(2)), 1);
    assert_eq!(state.plays_on(day(3)), 0);
    assert_eq!(state.max_daily_plays, 3);
    assert_eq!(state.total_plays, 4);
}

#[test]
fn test_record_attempt_awards_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let (stages, missions) = (stages(), missions());
    let engine = MissionEngine::new(&stages, &missions);

    {
        let mut store = ProgressStore::open(Box::new(FileStorage::new(dir.path())));
        let newly = store.record_attempt(&hit(1, 0.05), day(1), &engine).unwrap();
        assert_eq!(newly, vec![MissionId::Number(1)]);

        let again = store.record_attempt(&miss(2, 0.5), day(1), &engine).unwrap();
        assert!(again.is_empty());
    }

    let reopened = ProgressStore::open(Box::new(FileStorage::new(dir.path())));
    let state = reopened.state();
    assert_eq!(state.total_plays, 2);
    assert_eq!(state.completed_missions, vec![MissionId::Number(1)]);
    assert!(state.is_cleared(1));
    assert_eq!(state.stage(2).unwrap().failures, 1);
}

#[test]
fn test_write_failure_keeps_memory_state() {
    let (stages, missions) = (stages(), missions());
    let engine = MissionEngine::new(&stages, &missions);
    let mut store = ProgressStore::open(Box::new(ReadOnlyStorage));

    let err = store.record_attempt(&hit(1, 0.05), day(1), &engine).unwrap_err();
    assert_eq!(err.stage_id, 1);
    assert_eq!(err.newly_completed, vec![MissionId::Number(1)]);
    assert!(matches!(err.source, StorageError::Write { .. }));

    assert_eq!(store.state().total_plays, 1);
    assert!(store.state().is_cleared(1));
}

#[test]
fn test_skin_choice_is_stored_raw() {
    let mut store = ProgressStore::open(Box::new(MemoryStorage::new()));
    assert_eq!(store.selected_skin(), None);
    store.select_skin("ocean").unwrap();
    assert_eq!(store.selected_skin().as_deref(), Some("ocean"));
}
