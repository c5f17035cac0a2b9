use std::fmt;

use serde::{Deserialize, Serialize};

/// Mission identifiers appear as numbers or strings in mission files and
/// saved progress; both are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MissionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionId::Number(n) => write!(f, "{n}"),
            MissionId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MissionId {
    fn from(s: &str) -> Self {
        MissionId::Text(s.to_string())
    }
}

impl From<u64> for MissionId {
    fn from(n: u64) -> Self {
        MissionId::Number(n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    PlayCount,
    DailyPlay,
    Bingo,
    PerfectCombo,
    GroupClear,
    Lucky,
    AllBingo,
    StageFail,
    FirstTry,
    ZeroDiff,

    // v1 schema
    Combo,
    StageClear,
    PerfectTiming,
}

/// Which progress schema a mission kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionSchema {
    Shared,
    Grouped,
    Legacy,
}

impl MissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionKind::PlayCount => "play_count",
            MissionKind::DailyPlay => "daily_play",
            MissionKind::Bingo => "bingo",
            MissionKind::PerfectCombo => "perfect_combo",
            MissionKind::GroupClear => "group_clear",
            MissionKind::Lucky => "lucky",
            MissionKind::AllBingo => "all_bingo",
            MissionKind::StageFail => "stage_fail",
            MissionKind::FirstTry => "first_try",
            MissionKind::ZeroDiff => "zero_diff",
            MissionKind::Combo => "combo",
            MissionKind::StageClear => "stage_clear",
            MissionKind::PerfectTiming => "perfect_timing",
        }
    }

    /// Flag missions complete once their achievement is set; their threshold is 1.
    pub fn is_flag(&self) -> bool {
        matches!(self, MissionKind::Lucky | MissionKind::FirstTry | MissionKind::ZeroDiff)
    }

    pub fn schema(&self) -> MissionSchema {
        match self {
            MissionKind::PlayCount => MissionSchema::Shared,
            MissionKind::Combo | MissionKind::StageClear | MissionKind::PerfectTiming => {
                MissionSchema::Legacy
            }
            _ => MissionSchema::Grouped,
        }
    }
}

impl fmt::Display for MissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionDefinition {
    pub id: MissionId,
    #[serde(rename = "type")]
    pub kind: MissionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u64>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
}

impl MissionDefinition {
    /// Value the progress must reach. Flag missions ignore `target`.
    pub fn threshold(&self) -> u64 {
        if self.kind.is_flag() {
            1
        } else {
            self.target.unwrap_or(1)
        }
    }
}
