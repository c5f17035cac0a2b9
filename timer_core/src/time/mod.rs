pub mod clock;
pub mod stopwatch;

use serde::{Deserialize, Serialize};

/// Whole milliseconds. All verdict comparisons happen in this unit.
pub type Millis = i64;

pub fn secs_to_millis(secs: f64) -> Millis {
    (secs * 1000.0).round() as Millis
}

pub fn millis_to_secs(ms: Millis) -> f64 {
    ms as f64 / 1000.0
}

/// How raw clock readings become milliseconds, and what "exact" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingRule {
    /// Floor raw milliseconds; exact stages need a zero error.
    #[default]
    Truncate,
    /// Round raw milliseconds; exact stages accept errors under 10ms.
    LegacyRound,
}

impl TimingRule {
    pub fn quantize(&self, raw_ms: f64) -> Millis {
        let raw_ms = raw_ms.max(0.0);
        match self {
            TimingRule::Truncate => raw_ms.floor() as Millis,
            TimingRule::LegacyRound => raw_ms.round() as Millis,
        }
    }

    pub fn exact_hit(&self, diff_ms: Millis) -> bool {
        match self {
            TimingRule::Truncate => diff_ms == 0,
            TimingRule::LegacyRound => diff_ms < 10,
        }
    }
}
