use progress_data::ProgressState;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stage_schema::{MissionCatalog, MissionId, StageCatalog, StageDefinition, StageId};
use tracing::{debug, warn};

use super::judge::{Judge, Judgment, LapOutcome, MultiJudge, Verdict};
use super::targets::{self, ResolvedTargets};
use crate::config::GameConfig;
use crate::cosmetics::{self, Medal, Skin};
use crate::error::SessionError;
use crate::gate::{ProgressionGate, SectionProgress};
use crate::mission::{MissionEngine, MissionStatus};
use crate::progress::{AttemptRecord, FileStorage, ProgressStore, StorageError};
use crate::time::clock::{Clock, SystemClock};
use crate::time::stopwatch::Stopwatch;
use crate::time::{millis_to_secs, secs_to_millis};

/// What the screen needs before the player presses start.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptView {
    pub stage_id: StageId,
    pub name: String,
    pub is_exam: bool,
    /// Resolved headline target in seconds.
    pub target: f64,
    pub margin: f64,
    /// Lap targets in seconds, ascending; empty for single-target stages.
    pub laps: Vec<f64>,
    pub hide_after: Option<f64>,
}

impl AttemptView {
    fn new(stage: &StageDefinition, targets: &ResolvedTargets) -> Self {
        Self {
            stage_id: stage.id,
            name: stage.display_name(),
            is_exam: stage.is_exam,
            target: millis_to_secs(targets.target_ms),
            margin: stage.margin,
            laps: targets
                .laps
                .iter()
                .flatten()
                .map(|ms| millis_to_secs(*ms))
                .collect(),
            hide_after: stage.hide_after,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboSnapshot {
    pub total_plays: u64,
    pub current_combo: u32,
    pub max_combo: u32,
    pub perfect_combo: u32,
    pub max_perfect_combo: u32,
}

impl ComboSnapshot {
    fn of(state: &ProgressState) -> Self {
        Self {
            total_plays: state.total_plays,
            current_combo: state.current_combo,
            max_combo: state.max_combo,
            perfect_combo: state.perfect_combo,
            max_perfect_combo: state.max_perfect_combo,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptReport {
    pub stage_id: StageId,
    pub verdict: Verdict,
    /// The stage asks for a retry after a failure.
    pub retry_suggested: bool,
    pub newly_completed: Vec<MissionId>,
    /// Offered as "continue" after a success.
    pub next_stage: Option<StageId>,
    pub combo: ComboSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StopOutcome {
    /// A lap of a multi-target stage passed; the stopwatch keeps running.
    Lap(Judgment),
    Finished(AttemptReport),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// Nothing is running.
    Idle,
    Running { elapsed: f64, obscured: bool },
    /// The safety valve fired and the stop went through normal evaluation.
    AutoStopped(StopOutcome),
}

struct Attempt {
    stage: StageDefinition,
    targets: ResolvedTargets,
    judge: Judge,
    stopwatch: Stopwatch,
    laps: Option<MultiJudge>,
}

/// One player's game: catalogs, settings, progress and the attempt in flight.
pub struct GameSession {
    stages: StageCatalog,
    missions: MissionCatalog,
    config: GameConfig,
    store: ProgressStore,
    clock: Box<dyn Clock>,
    rng: StdRng,
    attempt: Option<Attempt>,
}

impl GameSession {
    pub fn new(
        stages: StageCatalog,
        missions: MissionCatalog,
        config: GameConfig,
        store: ProgressStore,
        clock: Box<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        Self {
            stages,
            missions,
            config,
            store,
            clock,
            rng,
            attempt: None,
        }
    }

    /// File-backed progress under `config.storage_dir`, system clock, entropy-seeded draws.
    pub fn open(stages: StageCatalog, missions: MissionCatalog, config: GameConfig) -> Self {
        let store = ProgressStore::open(Box::new(FileStorage::new(config.storage_dir.clone())));
        Self::new(
            stages,
            missions,
            config,
            store,
            Box::new(SystemClock::new()),
            StdRng::from_entropy(),
        )
    }

    pub fn stages(&self) -> &StageCatalog {
        &self.stages
    }

    pub fn missions(&self) -> &MissionCatalog {
        &self.missions
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn gate(&self) -> ProgressionGate<'_> {
        ProgressionGate::new(self.config.gate, &self.stages)
    }

    fn engine(&self) -> MissionEngine<'_> {
        MissionEngine::new(&self.stages, &self.missions)
    }

    /// Prepares an attempt with freshly drawn targets. `None` for unknown
    /// or locked stages, leaving everything untouched.
    pub fn start_attempt(&mut self, stage_id: StageId) -> Option<AttemptView> {
        let Some(stage) = self.stages.get(stage_id).cloned() else {
            debug!(stage = stage_id, "unknown stage");
            return None;
        };
        if !self.is_playable(stage_id) {
            debug!(stage = stage_id, "stage is locked");
            return None;
        }
        if self.attempt.take().is_some() {
            debug!("previous attempt abandoned");
        }

        let rule = self.config.timing_rule;
        let targets = targets::resolve(&stage, &mut self.rng);
        let judge = Judge::for_stage(rule, &stage);
        let laps = targets.laps.clone().map(|laps| MultiJudge::new(judge, laps));
        let view = AttemptView::new(&stage, &targets);
        debug!(stage = stage_id, target_ms = targets.target_ms, laps = view.laps.len(), "attempt ready");

        self.attempt = Some(Attempt {
            stage,
            targets,
            judge,
            stopwatch: Stopwatch::new(rule),
            laps,
        });
        Some(view)
    }

    /// Starts the stopwatch of the prepared attempt.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        let now = self.clock.now_ms();
        let attempt = self.attempt.as_mut().ok_or(SessionError::NoAttempt)?;
        if attempt.stopwatch.is_running() {
            return Err(SessionError::AlreadyRunning);
        }
        attempt.stopwatch.start(now);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.attempt.as_ref().is_some_and(|a| a.stopwatch.is_running())
    }

    /// Polled every frame while running.
    pub fn tick(&mut self) -> Result<Tick, SessionError> {
        let now = self.clock.now_ms();
        let Some(attempt) = self.attempt.as_ref() else {
            return Ok(Tick::Idle);
        };
        let Some(elapsed_ms) = attempt.stopwatch.elapsed_ms(now) else {
            return Ok(Tick::Idle);
        };

        let limit_ms = attempt.targets.target_ms + secs_to_millis(self.config.auto_stop_grace_secs);
        let obscured = attempt
            .stage
            .hide_after
            .is_some_and(|hide| elapsed_ms > secs_to_millis(hide));

        if elapsed_ms > limit_ms {
            debug!(elapsed_ms, limit_ms, "auto-stop");
            return self.stop_at(now).map(Tick::AutoStopped);
        }

        Ok(Tick::Running {
            elapsed: millis_to_secs(elapsed_ms),
            obscured,
        })
    }

    pub fn stop_attempt(&mut self) -> Result<StopOutcome, SessionError> {
        let now = self.clock.now_ms();
        self.stop_at(now)
    }

    /// Drops the attempt in flight without recording anything.
    pub fn abandon(&mut self) {
        if self.attempt.take().is_some() {
            debug!("attempt abandoned");
        }
    }

    fn stop_at(&mut self, now_ms: f64) -> Result<StopOutcome, SessionError> {
        let attempt = self.attempt.as_mut().ok_or(SessionError::NoAttempt)?;
        let stopped_ms = attempt
            .stopwatch
            .elapsed_ms(now_ms)
            .ok_or(SessionError::NotRunning)?;

        let verdict = match attempt.laps.as_mut() {
            None => attempt.judge.single(attempt.targets.target_ms, stopped_ms),
            Some(laps) => {
                if let Some(LapOutcome::Continue(judgment)) = laps.record(stopped_ms) {
                    debug!(lap = laps.results().len(), diff_ms = judgment.diff_ms, "lap passed");
                    return Ok(StopOutcome::Lap(judgment));
                }
                laps.verdict().ok_or(SessionError::NotRunning)?
            }
        };

        let stage_id = attempt.stage.id;
        let retry_suggested = attempt.stage.repeat_count.is_some() && !verdict.success;
        self.attempt = None;
        self.finish(stage_id, verdict, retry_suggested)
    }

    fn finish(
        &mut self,
        stage_id: StageId,
        verdict: Verdict,
        retry_suggested: bool,
    ) -> Result<StopOutcome, SessionError> {
        let record = AttemptRecord {
            stage_id,
            success: verdict.success,
            diff: verdict.diff,
            stopped_time: Some(verdict.stopped),
        };
        let today = self.clock.today();
        let engine = MissionEngine::new(&self.stages, &self.missions);

        let (newly_completed, write_error): (Vec<MissionId>, Option<StorageError>) =
            match self.store.record_attempt(&record, today, &engine) {
                Ok(newly) => (newly, None),
                Err(e) => (e.newly_completed, Some(e.source)),
            };

        let next_stage = if verdict.success {
            self.next_playable(stage_id)
        } else {
            None
        };
        let report = AttemptReport {
            stage_id,
            verdict,
            retry_suggested,
            newly_completed,
            next_stage,
            combo: ComboSnapshot::of(self.store.state()),
        };

        match write_error {
            None => Ok(StopOutcome::Finished(report)),
            Some(source) => {
                warn!(stage = stage_id, error = %source, "attempt result not persisted");
                Err(SessionError::Persist {
                    report: Box::new(report),
                    source,
                })
            }
        }
    }

    pub fn query_progress(&self) -> &ProgressState {
        self.store.state()
    }

    pub fn is_playable(&self, stage_id: StageId) -> bool {
        self.gate().is_playable(self.store.state(), stage_id)
    }

    pub fn next_playable(&self, stage_id: StageId) -> Option<StageId> {
        self.gate().next_playable(self.store.state(), stage_id)
    }

    pub fn section_progress(&self, exam_id: StageId) -> SectionProgress {
        self.gate().section_progress(self.store.state(), exam_id)
    }

    pub fn mission_progress(&self) -> Vec<MissionStatus> {
        self.engine().statuses(self.store.state(), self.clock.today())
    }

    pub fn medal(&self) -> Option<Medal> {
        Medal::for_completed(self.store.state().completed_missions.len())
    }

    pub fn unlocked_skins(&self) -> Vec<&'static Skin> {
        cosmetics::unlocked_skins(self.config.cosmetics, self.medal())
    }

    /// Saved skin if it is still known and unlocked, the default otherwise.
    pub fn current_skin(&self) -> &'static str {
        self.store
            .selected_skin()
            .and_then(|id| self.unlocked_skins().into_iter().find(|s| s.id == id))
            .map_or(cosmetics::DEFAULT_SKIN, |s| s.id)
    }

    /// `Ok(false)` when the skin is unknown or still locked.
    pub fn select_skin(&mut self, skin_id: &str) -> Result<bool, StorageError> {
        if !self.unlocked_skins().iter().any(|s| s.id == skin_id) {
            return Ok(false);
        }
        self.store.select_skin(skin_id)?;
        Ok(true)
    }
}
