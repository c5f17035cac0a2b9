use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medal {
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl Medal {
    pub const ALL: [Medal; 4] = [Medal::Bronze, Medal::Silver, Medal::Gold, Medal::Diamond];

    pub fn required_missions(&self) -> usize {
        match self {
            Medal::Bronze => 3,
            Medal::Silver => 7,
            Medal::Gold => 11,
            Medal::Diamond => 15,
        }
    }

    /// Highest tier reached with `completed` missions.
    pub fn for_completed(completed: usize) -> Option<Medal> {
        Self::ALL
            .into_iter()
            .rev()
            .find(|m| completed >= m.required_missions())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Medal::Bronze => "bronze",
            Medal::Silver => "silver",
            Medal::Gold => "gold",
            Medal::Diamond => "diamond",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skin {
    pub id: &'static str,
    pub unlock_medal: Option<Medal>,
}

pub const DEFAULT_SKIN: &str = "default";

pub const SKINS: [Skin; 7] = [
    Skin { id: DEFAULT_SKIN, unlock_medal: None },
    Skin { id: "sunset", unlock_medal: Some(Medal::Silver) },
    Skin { id: "ocean", unlock_medal: Some(Medal::Silver) },
    Skin { id: "forest", unlock_medal: Some(Medal::Gold) },
    Skin { id: "night", unlock_medal: Some(Medal::Gold) },
    Skin { id: "neon", unlock_medal: Some(Medal::Diamond) },
    Skin { id: "gold", unlock_medal: Some(Medal::Diamond) },
];

/// Whether medals gate skins at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CosmeticPolicy {
    Gated,
    #[default]
    AllUnlocked,
}

pub fn unlocked_skins(policy: CosmeticPolicy, medal: Option<Medal>) -> Vec<&'static Skin> {
    SKINS
        .iter()
        .filter(|skin| match (policy, skin.unlock_medal) {
            (CosmeticPolicy::AllUnlocked, _) | (_, None) => true,
            (CosmeticPolicy::Gated, Some(required)) => medal.is_some_and(|m| m >= required),
        })
        .collect()
}
