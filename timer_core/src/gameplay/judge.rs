use stage_schema::StageDefinition;

use crate::time::{millis_to_secs, secs_to_millis, Millis, TimingRule};

/// Aggregate error reported for a failed multi-target attempt. It lies
/// outside any stage margin, so it never improves a best record.
pub const MULTI_FAILURE_DIFF: f64 = 999.0;

/// One stop measured against one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgment {
    pub target_ms: Millis,
    pub stopped_ms: Millis,
    pub diff_ms: Millis,
    pub success: bool,
}

impl Judgment {
    pub fn target_secs(&self) -> f64 {
        millis_to_secs(self.target_ms)
    }

    pub fn stopped_secs(&self) -> f64 {
        millis_to_secs(self.stopped_ms)
    }

    pub fn diff_secs(&self) -> f64 {
        millis_to_secs(self.diff_ms)
    }
}

/// Outcome of a whole attempt, as handed to the progress store.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub success: bool,
    /// Error in seconds; `0` or [`MULTI_FAILURE_DIFF`] for multi-target stages.
    pub diff: f64,
    /// The last stopped time, in seconds.
    pub stopped: f64,
    /// Per-target results of a multi-target attempt, in order.
    pub laps: Vec<Judgment>,
}

/// Tolerance rule of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judge {
    pub rule: TimingRule,
    /// `None` means the stop must match exactly.
    pub margin_ms: Option<Millis>,
}

impl Judge {
    pub fn new(rule: TimingRule, margin_secs: f64) -> Self {
        let margin_ms = (margin_secs > 0.0).then(|| secs_to_millis(margin_secs));
        Self { rule, margin_ms }
    }

    pub fn for_stage(rule: TimingRule, stage: &StageDefinition) -> Self {
        Self::new(rule, stage.margin)
    }

    pub fn judge(&self, target_ms: Millis, stopped_ms: Millis) -> Judgment {
        let diff_ms = (stopped_ms - target_ms).abs();
        let success = match self.margin_ms {
            None => self.rule.exact_hit(diff_ms),
            Some(margin) => diff_ms <= margin,
        };
        Judgment {
            target_ms,
            stopped_ms,
            diff_ms,
            success,
        }
    }

    pub fn single(&self, target_ms: Millis, stopped_ms: Millis) -> Verdict {
        let judgment = self.judge(target_ms, stopped_ms);
        Verdict {
            success: judgment.success,
            diff: judgment.diff_secs(),
            stopped: judgment.stopped_secs(),
            laps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapOutcome {
    /// More targets remain; the stopwatch keeps running.
    Continue(Judgment),
    /// The sequence is over, by failure or by exhausting the targets.
    Finished(Judgment),
}

/// Walks a multi-target sequence one stop at a time.
#[derive(Debug, Clone)]
pub struct MultiJudge {
    judge: Judge,
    targets: Vec<Millis>,
    results: Vec<Judgment>,
}

impl MultiJudge {
    /// `targets` must already be sorted ascending.
    pub fn new(judge: Judge, targets: Vec<Millis>) -> Self {
        Self {
            judge,
            targets,
            results: Vec::new(),
        }
    }

    pub fn targets(&self) -> &[Millis] {
        &self.targets
    }

    pub fn results(&self) -> &[Judgment] {
        &self.results
    }

    pub fn current_target(&self) -> Option<Millis> {
        if self.is_finished() {
            return None;
        }
        self.targets.get(self.results.len()).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.results.last().is_some_and(|r| !r.success) || self.results.len() >= self.targets.len()
    }

    /// Judges a stop against the next pending target. `None` once finished.
    pub fn record(&mut self, stopped_ms: Millis) -> Option<LapOutcome> {
        let target_ms = self.current_target()?;
        let judgment = self.judge.judge(target_ms, stopped_ms);
        self.results.push(judgment);

        if self.is_finished() {
            Some(LapOutcome::Finished(judgment))
        } else {
            Some(LapOutcome::Continue(judgment))
        }
    }

    /// The attempt verdict, available once the sequence is finished.
    pub fn verdict(&self) -> Option<Verdict> {
        if !self.is_finished() {
            return None;
        }
        let success = self.results.len() == self.targets.len() && self.results.iter().all(|r| r.success);
        let stopped = self.results.last().map(Judgment::stopped_secs).unwrap_or(0.0);
        Some(Verdict {
            success,
            diff: if success { 0.0 } else { MULTI_FAILURE_DIFF },
            stopped,
            laps: self.results.clone(),
        })
    }
}
