use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stage_schema::{MissionId, StageId};

pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Per-stage play record.
///
/// `attempts == successes + failures`, and `best_diff` is set exactly when
/// `successes > 0`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageRecord {
    pub attempts: u32,
    pub successes: u32,
    pub failures: u32,
    /// Smallest error of any success, rounded to milliseconds.
    pub best_diff: Option<f64>,
    /// Failures recorded before the first success; frozen afterwards.
    pub failures_before_success: u32,
}

impl StageRecord {
    pub fn is_cleared(&self) -> bool {
        self.successes > 0
    }
}

/// Everything the game remembers between sessions.
///
/// Every field has a default so records written by older builds, which lack
/// some of them, still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressState {
    pub schema_version: u32,
    pub stages: BTreeMap<StageId, StageRecord>,
    pub total_plays: u64,
    /// Successes with a rounded error of at most 0.01s.
    pub perfect_count: u64,
    pub current_combo: u32,
    pub max_combo: u32,
    pub perfect_combo: u32,
    pub max_perfect_combo: u32,
    pub daily_plays: BTreeMap<NaiveDate, u32>,
    pub max_daily_plays: u32,
    pub lucky_achieved: bool,
    pub zero_diff_achieved: bool,
    pub first_try_achieved: bool,
    /// Award order is kept; entries are never removed.
    pub completed_missions: Vec<MissionId>,
    /// Stage ids cleared under the v1 schema, which kept no per-stage records.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub legacy_cleared: BTreeSet<StageId>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            stages: BTreeMap::new(),
            total_plays: 0,
            perfect_count: 0,
            current_combo: 0,
            max_combo: 0,
            perfect_combo: 0,
            max_perfect_combo: 0,
            daily_plays: BTreeMap::new(),
            max_daily_plays: 0,
            lucky_achieved: false,
            zero_diff_achieved: false,
            first_try_achieved: false,
            completed_missions: Vec::new(),
            legacy_cleared: BTreeSet::new(),
        }
    }
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, id: StageId) -> Option<&StageRecord> {
        self.stages.get(&id)
    }

    pub fn is_cleared(&self, id: StageId) -> bool {
        self.stages.get(&id).is_some_and(StageRecord::is_cleared) || self.legacy_cleared.contains(&id)
    }

    /// Distinct stages cleared, including ones carried over from v1.
    pub fn cleared_count(&self) -> usize {
        let recorded = self.stages.iter().filter(|(_, r)| r.is_cleared()).map(|(id, _)| *id);
        recorded.chain(self.legacy_cleared.iter().copied()).collect::<BTreeSet<_>>().len()
    }

    pub fn best_diff(&self, id: StageId) -> Option<f64> {
        self.stages.get(&id).and_then(|r| r.best_diff)
    }

    pub fn plays_on(&self, day: NaiveDate) -> u32 {
        self.daily_plays.get(&day).copied().unwrap_or(0)
    }

    pub fn max_failures_before_success(&self) -> u32 {
        self.stages.values().map(|r| r.failures_before_success).max().unwrap_or(0)
    }

    pub fn has_completed(&self, id: &MissionId) -> bool {
        self.completed_missions.contains(id)
    }

    /// Returns `false` if the mission was already recorded.
    pub fn mark_completed(&mut self, id: MissionId) -> bool {
        if self.has_completed(&id) {
            return false;
        }
        self.completed_missions.push(id);
        true
    }
}
