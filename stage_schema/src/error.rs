use thiserror::Error;

use crate::mission::{MissionId, MissionKind};
use crate::stage::StageId;

/// A single stage entry failed validation while being parsed.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("stage {id}: {reason}")]
pub struct StageError {
    pub id: StageId,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stage list is empty")]
    NoStages,

    #[error("duplicate stage id {0}")]
    DuplicateStage(StageId),

    #[error("duplicate mission id {0}")]
    DuplicateMission(MissionId),

    #[error("mission {id}: type {kind} requires a target")]
    MissingTarget { id: MissionId, kind: MissionKind },

    #[error("mission list mixes legacy type {legacy} with grouped type {grouped}")]
    MixedSchemas { legacy: MissionKind, grouped: MissionKind },
}
