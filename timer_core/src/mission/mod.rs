pub mod bingo;

use chrono::NaiveDate;
use progress_data::ProgressState;
use stage_schema::{MissionCatalog, MissionDefinition, MissionId, MissionKind, StageCatalog};
use tracing::info;

use crate::gate::cleared_group_count;

/// Everything a mission can measure, computed once per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Aggregates {
    pub total_plays: u64,
    pub today_plays: u64,
    pub bingo_lines: u64,
    pub all_bingo_groups: u64,
    pub cleared_groups: u64,
    pub max_stage_failures: u64,
    pub max_combo: u64,
    pub max_perfect_combo: u64,
    pub cleared_stages: u64,
    pub perfect_count: u64,
    pub lucky: bool,
    pub first_try: bool,
    pub zero_diff: bool,
}

impl Aggregates {
    pub fn collect(stages: &StageCatalog, state: &ProgressState, today: NaiveDate) -> Self {
        Self {
            total_plays: state.total_plays,
            today_plays: u64::from(state.plays_on(today)),
            bingo_lines: u64::from(bingo::total_bingo_lines(stages, state)),
            all_bingo_groups: u64::from(bingo::all_bingo_count(stages, state)),
            cleared_groups: u64::from(cleared_group_count(stages, state)),
            max_stage_failures: u64::from(state.max_failures_before_success()),
            max_combo: u64::from(state.max_combo),
            max_perfect_combo: u64::from(state.max_perfect_combo),
            cleared_stages: state.cleared_count() as u64,
            perfect_count: state.perfect_count,
            lucky: state.lucky_achieved,
            first_try: state.first_try_achieved,
            zero_diff: state.zero_diff_achieved,
        }
    }

    pub fn progress_of(&self, kind: MissionKind) -> u64 {
        match kind {
            MissionKind::PlayCount => self.total_plays,
            MissionKind::DailyPlay => self.today_plays,
            MissionKind::Bingo => self.bingo_lines,
            MissionKind::PerfectCombo => self.max_perfect_combo,
            MissionKind::GroupClear => self.cleared_groups,
            MissionKind::Lucky => u64::from(self.lucky),
            MissionKind::AllBingo => self.all_bingo_groups,
            MissionKind::StageFail => self.max_stage_failures,
            MissionKind::FirstTry => u64::from(self.first_try),
            MissionKind::ZeroDiff => u64::from(self.zero_diff),
            MissionKind::Combo => self.max_combo,
            MissionKind::StageClear => self.cleared_stages,
            MissionKind::PerfectTiming => self.perfect_count,
        }
    }
}

/// Display row for the mission screen.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionStatus {
    pub id: MissionId,
    pub kind: MissionKind,
    pub title: Option<String>,
    pub current: u64,
    pub target: u64,
    pub completed: bool,
    /// Hidden missions show up only once completed.
    pub visible: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct MissionEngine<'a> {
    stages: &'a StageCatalog,
    missions: &'a MissionCatalog,
}

impl<'a> MissionEngine<'a> {
    pub fn new(stages: &'a StageCatalog, missions: &'a MissionCatalog) -> Self {
        Self { stages, missions }
    }

    fn is_met(mission: &MissionDefinition, aggregates: &Aggregates) -> bool {
        aggregates.progress_of(mission.kind) >= mission.threshold()
    }

    /// Missions whose condition now holds but which are not yet recorded.
    pub fn pending(&self, state: &ProgressState, today: NaiveDate) -> Vec<MissionId> {
        let aggregates = Aggregates::collect(self.stages, state, today);
        self.missions
            .iter()
            .filter(|m| !state.has_completed(&m.id))
            .filter(|m| Self::is_met(m, &aggregates))
            .map(|m| m.id.clone())
            .collect()
    }

    /// Records every pending mission and returns the ids newly added.
    pub fn evaluate(&self, state: &mut ProgressState, today: NaiveDate) -> Vec<MissionId> {
        let newly = self.pending(state, today);
        for id in &newly {
            info!(mission = %id, "mission completed");
            state.mark_completed(id.clone());
        }
        newly
    }

    pub fn statuses(&self, state: &ProgressState, today: NaiveDate) -> Vec<MissionStatus> {
        let aggregates = Aggregates::collect(self.stages, state, today);
        self.missions
            .iter()
            .map(|m| {
                let completed = state.has_completed(&m.id);
                MissionStatus {
                    id: m.id.clone(),
                    kind: m.kind,
                    title: m.title.clone(),
                    current: aggregates.progress_of(m.kind),
                    target: m.threshold(),
                    completed,
                    visible: !m.hidden || completed,
                }
            })
            .collect()
    }
}
