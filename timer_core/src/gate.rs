use progress_data::ProgressState;
use serde::{Deserialize, Serialize};
use stage_schema::{GroupId, StageCatalog, StageId};

/// Which stages may be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// Everything is playable.
    #[default]
    Open,
    /// Stage 1 is open; every other stage needs stage `id - 1` cleared.
    Sequential,
    /// Exams close sections: a section opens once the previous exam is
    /// cleared, and its exam opens once every stage of the section is.
    Sectioned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionProgress {
    pub cleared: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressionGate<'a> {
    mode: GateMode,
    stages: &'a StageCatalog,
}

impl<'a> ProgressionGate<'a> {
    pub fn new(mode: GateMode, stages: &'a StageCatalog) -> Self {
        Self { mode, stages }
    }

    /// Unknown ids are never playable.
    pub fn is_playable(&self, state: &ProgressState, id: StageId) -> bool {
        let Some(stage) = self.stages.get(id) else {
            return false;
        };

        match self.mode {
            GateMode::Open => true,
            GateMode::Sequential => id == 1 || state.is_cleared(id - 1),
            GateMode::Sectioned => {
                let previous_exam_cleared = self
                    .stages
                    .previous_exam(id)
                    .map_or(true, |exam| state.is_cleared(exam.id));
                if !stage.is_exam {
                    return previous_exam_cleared;
                }
                previous_exam_cleared
                    && self
                        .stages
                        .section_stages(id)
                        .into_iter()
                        .all(|s| state.is_cleared(s))
            }
        }
    }

    /// First playable stage above `current`, scanning ids upward.
    pub fn next_playable(&self, state: &ProgressState, current: StageId) -> Option<StageId> {
        self.stages
            .iter()
            .map(|s| s.id)
            .filter(|id| *id > current)
            .find(|id| self.is_playable(state, *id))
    }

    /// Cleared/total count of the stages an exam closes.
    pub fn section_progress(&self, state: &ProgressState, exam_id: StageId) -> SectionProgress {
        let section = self.stages.section_stages(exam_id);
        SectionProgress {
            cleared: section.iter().filter(|id| state.is_cleared(**id)).count(),
            total: section.len(),
        }
    }
}

/// A group is complete once its exam is cleared; groups without an exam never are.
pub fn is_group_completed(stages: &StageCatalog, state: &ProgressState, group: GroupId) -> bool {
    stages
        .exam_of_group(group)
        .is_some_and(|exam| state.is_cleared(exam.id))
}

pub fn cleared_group_count(stages: &StageCatalog, state: &ProgressState) -> u32 {
    stages
        .groups()
        .into_iter()
        .filter(|g| is_group_completed(stages, state, *g))
        .count() as u32
}
