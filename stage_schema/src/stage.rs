use serde::{Deserialize, Serialize};

use crate::error::StageError;

pub type StageId = u32;
pub type GroupId = i32;

/// How the stage's headline target is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Fixed(f64),
    /// Drawn uniformly from `min..=max` (whole seconds) when an attempt starts.
    Random { min: u32, max: u32 },
}

impl Target {
    /// Midpoint for random targets, the fixed value otherwise.
    pub fn nominal_secs(&self) -> f64 {
        match *self {
            Target::Fixed(secs) => secs,
            Target::Random { min, max } => (f64::from(min) + f64::from(max)) / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MultiTargets {
    Explicit(Vec<f64>),
    /// 5..=12 generated targets, multiples of 0.5 in `[5.0, 59.5]`.
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStage", into = "RawStage")]
pub struct StageDefinition {
    pub id: StageId,
    pub group: GroupId,
    pub is_exam: bool,
    pub exam_name: Option<String>,
    pub target: Target,
    pub margin: f64,
    pub hide_after: Option<f64>,
    pub multi: Option<MultiTargets>,
    pub repeat_count: Option<u32>,
}

impl StageDefinition {
    pub fn is_multi(&self) -> bool {
        self.multi.is_some()
    }

    pub fn is_exact(&self) -> bool {
        self.margin == 0.0
    }

    pub fn display_name(&self) -> String {
        match (&self.exam_name, self.is_exam) {
            (Some(name), true) => name.clone(),
            (None, true) => format!("Exam {}", self.id),
            _ => format!("Stage {}", self.id),
        }
    }
}

// Wire shape of a stage entry in the stage list JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStage {
    id: StageId,
    #[serde(default)]
    group: GroupId,
    #[serde(default, alias = "isExam")]
    exam: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exam_name: Option<String>,
    target: RawTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_range: Option<[u32; 2]>,
    #[serde(default)]
    margin: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hide_after: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    multi: Option<RawMulti>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repeat_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawTarget {
    Seconds(f64),
    Marker(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawMulti {
    List(Vec<f64>),
    Flag(bool),
}

const RANDOM_MARKER: &str = "random";

impl TryFrom<RawStage> for StageDefinition {
    type Error = StageError;

    fn try_from(raw: RawStage) -> Result<Self, Self::Error> {
        let id = raw.id;
        let invalid = |reason: String| StageError { id, reason };

        if id == 0 {
            return Err(invalid("id must be positive".to_string()));
        }

        let target = match raw.target {
            RawTarget::Seconds(secs) => {
                if !(secs.is_finite() && secs > 0.0) {
                    return Err(invalid(format!("target must be a positive number, got {secs}")));
                }
                Target::Fixed(secs)
            }
            RawTarget::Marker(marker) if marker == RANDOM_MARKER => {
                let [min, max] = raw
                    .target_range
                    .ok_or_else(|| invalid("random target requires targetRange".to_string()))?;
                if min > max {
                    return Err(invalid(format!("targetRange [{min}, {max}] is reversed")));
                }
                Target::Random { min, max }
            }
            RawTarget::Marker(marker) => {
                return Err(invalid(format!("unknown target marker {marker:?}")));
            }
        };

        if !(raw.margin.is_finite() && raw.margin >= 0.0) {
            return Err(invalid(format!("margin must be non-negative, got {}", raw.margin)));
        }

        if let Some(hide) = raw.hide_after {
            if !(hide.is_finite() && hide > 0.0) {
                return Err(invalid(format!("hideAfter must be positive, got {hide}")));
            }
        }

        let multi = match raw.multi {
            None | Some(RawMulti::Flag(false)) => None,
            Some(RawMulti::Flag(true)) => Some(MultiTargets::Random),
            Some(RawMulti::List(list)) => {
                if list.is_empty() {
                    return Err(invalid("multi list is empty".to_string()));
                }
                if let Some(bad) = list.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
                    return Err(invalid(format!("multi target must be positive, got {bad}")));
                }
                Some(MultiTargets::Explicit(list))
            }
        };

        Ok(Self {
            id,
            group: raw.group,
            is_exam: raw.exam,
            exam_name: raw.exam_name,
            target,
            margin: raw.margin,
            hide_after: raw.hide_after,
            multi,
            repeat_count: raw.repeat_count,
        })
    }
}

impl From<StageDefinition> for RawStage {
    fn from(stage: StageDefinition) -> Self {
        let (target, target_range) = match stage.target {
            Target::Fixed(secs) => (RawTarget::Seconds(secs), None),
            Target::Random { min, max } => (RawTarget::Marker(RANDOM_MARKER.to_string()), Some([min, max])),
        };
        let multi = stage.multi.map(|m| match m {
            MultiTargets::Explicit(list) => RawMulti::List(list),
            MultiTargets::Random => RawMulti::Flag(true),
        });

        Self {
            id: stage.id,
            group: stage.group,
            exam: stage.is_exam,
            exam_name: stage.exam_name,
            target,
            target_range,
            margin: stage.margin,
            hide_after: stage.hide_after,
            multi,
            repeat_count: stage.repeat_count,
        }
    }
}
