mod catalog;
mod error;
mod mission;
mod stage;

pub use catalog::{MissionCatalog, StageCatalog};
pub use error::{CatalogError, StageError};
pub use mission::{MissionDefinition, MissionId, MissionKind, MissionSchema};
pub use stage::{GroupId, MultiTargets, StageDefinition, StageId, Target};
