use chrono::NaiveDate;
use progress_data::{ProgressState, PROGRESS_KEY, SKIN_KEY};
use stage_schema::{MissionId, StageId};
use thiserror::Error;
use tracing::debug;

use super::migrate::load_progress;
use super::storage::{Storage, StorageError};
use crate::mission::MissionEngine;
use crate::time::{millis_to_secs, secs_to_millis, Millis};

const PERFECT_DIFF_MS: Millis = 10;
const FIRST_TRY_DIFF_MS: Millis = 50;
const LUCKY_STOP_MS: Millis = 7_777;

/// One finished attempt as the store sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptRecord {
    pub stage_id: StageId,
    pub success: bool,
    /// Absolute error in seconds, rounded to milliseconds on entry.
    pub diff: f64,
    pub stopped_time: Option<f64>,
}

/// The attempt was applied in memory but could not be written.
#[derive(Debug, Error)]
#[error("attempt on stage {stage_id} was not saved: {source}")]
pub struct PersistError {
    pub stage_id: StageId,
    pub newly_completed: Vec<MissionId>,
    #[source]
    pub source: StorageError,
}

/// Applies one finished attempt to the in-memory state. Does not persist.
pub fn apply_attempt(state: &mut ProgressState, attempt: &AttemptRecord, today: NaiveDate) {
    let diff_ms = secs_to_millis(attempt.diff);
    let was_cleared = state.is_cleared(attempt.stage_id);
    let record = state.stages.entry(attempt.stage_id).or_default();
    let first_attempt = record.attempts == 0;

    if first_attempt && attempt.success && diff_ms <= FIRST_TRY_DIFF_MS {
        state.first_try_achieved = true;
    }

    record.attempts += 1;
    if attempt.success {
        record.successes += 1;
        let rounded = millis_to_secs(diff_ms);
        record.best_diff = Some(match record.best_diff {
            Some(best) if secs_to_millis(best) <= diff_ms => best,
            _ => rounded,
        });
    } else {
        record.failures += 1;
        if !was_cleared {
            record.failures_before_success += 1;
        }
    }

    state.total_plays += 1;
    let today_plays = state.daily_plays.entry(today).or_insert(0);
    *today_plays += 1;
    state.max_daily_plays = state.max_daily_plays.max(*today_plays);

    if attempt.success {
        state.current_combo += 1;
        state.max_combo = state.max_combo.max(state.current_combo);

        if diff_ms <= PERFECT_DIFF_MS {
            state.perfect_count += 1;
            state.perfect_combo += 1;
            state.max_perfect_combo = state.max_perfect_combo.max(state.perfect_combo);
        } else {
            state.perfect_combo = 0;
        }

        if diff_ms == 0 {
            state.zero_diff_achieved = true;
        }
    } else {
        state.current_combo = 0;
        state.perfect_combo = 0;
    }

    if attempt.stopped_time.is_some_and(|t| secs_to_millis(t) == LUCKY_STOP_MS) {
        state.lucky_achieved = true;
    }
}

/// Sole owner of the durable progress record.
pub struct ProgressStore {
    storage: Box<dyn Storage>,
    state: ProgressState,
}

impl ProgressStore {
    /// Loads whatever is persisted; never fails.
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let state = load_progress(storage.as_ref());
        Self { storage, state }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn save(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.state).map_err(|source| StorageError::Serialize {
            key: PROGRESS_KEY.to_string(),
            source,
        })?;
        self.storage.write(PROGRESS_KEY, &json)
    }

    /// Applies the attempt, persists, then awards missions and persists again
    /// if any completed. On a write failure the in-memory state is still
    /// fully updated.
    pub fn record_attempt(
        &mut self,
        attempt: &AttemptRecord,
        today: NaiveDate,
        missions: &MissionEngine<'_>,
    ) -> Result<Vec<MissionId>, PersistError> {
        apply_attempt(&mut self.state, attempt, today);
        debug!(
            stage = attempt.stage_id,
            success = attempt.success,
            diff = attempt.diff,
            total_plays = self.state.total_plays,
            "attempt recorded"
        );
        let first_write = self.save();

        let newly_completed = missions.evaluate(&mut self.state, today);
        let write = match first_write {
            Ok(()) if !newly_completed.is_empty() => self.save(),
            other => other,
        };

        match write {
            Ok(()) => Ok(newly_completed),
            Err(source) => Err(PersistError {
                stage_id: attempt.stage_id,
                newly_completed,
                source,
            }),
        }
    }

    /// Selected skin id, if one was ever saved.
    pub fn selected_skin(&self) -> Option<String> {
        self.storage.read(SKIN_KEY).ok().flatten()
    }

    pub fn select_skin(&mut self, skin_id: &str) -> Result<(), StorageError> {
        self.storage.write(SKIN_KEY, skin_id)
    }
}
