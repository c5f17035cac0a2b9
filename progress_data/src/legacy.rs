//! Records written by the v1 schema: an aggregate stats blob plus a separate
//! list of cleared stage ids. Neither carries per-stage detail.

use serde::{Deserialize, Serialize};
use stage_schema::{MissionId, StageId};

use crate::model::ProgressState;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyStats {
    pub total_plays: u64,
    pub perfect_count: u64,
    pub current_combo: u32,
    pub max_combo: u32,
    pub completed_missions: Vec<MissionId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyProgress {
    pub cleared: Vec<StageId>,
}

impl LegacyStats {
    /// Maps a v1 pair onto the current shape.
    ///
    /// Carried over: play count, perfect count, both combo counters, completed
    /// missions, cleared ids (into `legacy_cleared`). Defaulted: per-stage
    /// records (empty), perfect streaks (0), daily plays (empty) and every
    /// one-shot flag (`false`).
    pub fn upgrade(self, progress: LegacyProgress) -> ProgressState {
        let mut state = ProgressState {
            total_plays: self.total_plays,
            perfect_count: self.perfect_count,
            current_combo: self.current_combo,
            max_combo: self.max_combo,
            legacy_cleared: progress.cleared.into_iter().collect(),
            ..ProgressState::default()
        };
        for id in self.completed_missions {
            state.mark_completed(id);
        }
        state
    }
}
