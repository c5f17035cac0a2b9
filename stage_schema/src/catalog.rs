use std::collections::HashSet;

use crate::error::CatalogError;
use crate::mission::{MissionDefinition, MissionSchema};
use crate::stage::{GroupId, StageDefinition, StageId};

/// The validated stage list, ordered by stage id.
#[derive(Debug, Clone, PartialEq)]
pub struct StageCatalog {
    stages: Vec<StageDefinition>,
}

impl StageCatalog {
    pub fn new(mut stages: Vec<StageDefinition>) -> Result<Self, CatalogError> {
        if stages.is_empty() {
            return Err(CatalogError::NoStages);
        }
        stages.sort_by_key(|s| s.id);
        if let Some(pair) = stages.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(CatalogError::DuplicateStage(pair[0].id));
        }
        Ok(Self { stages })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let stages: Vec<StageDefinition> = serde_json::from_str(json)?;
        Self::new(stages)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        let stages: Vec<StageDefinition> = serde_json::from_slice(bytes)?;
        Self::new(stages)
    }

    pub fn get(&self, id: StageId) -> Option<&StageDefinition> {
        self.stages
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .map(|idx| &self.stages[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageDefinition> {
        self.stages.iter()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Distinct group keys in order of first appearance.
    pub fn groups(&self) -> Vec<GroupId> {
        let mut seen = HashSet::new();
        self.stages
            .iter()
            .filter(|s| seen.insert(s.group))
            .map(|s| s.group)
            .collect()
    }

    pub fn group_stages(&self, group: GroupId) -> impl Iterator<Item = &StageDefinition> {
        self.stages.iter().filter(move |s| s.group == group)
    }

    pub fn exam_of_group(&self, group: GroupId) -> Option<&StageDefinition> {
        self.group_stages(group).find(|s| s.is_exam)
    }

    pub fn exams(&self) -> impl Iterator<Item = &StageDefinition> {
        self.stages.iter().filter(|s| s.is_exam)
    }

    /// Non-exam stages between the previous exam and `exam_id`, in order.
    /// Empty when `exam_id` is not an exam.
    pub fn section_stages(&self, exam_id: StageId) -> Vec<StageId> {
        let Some(pos) = self.stages.iter().position(|s| s.id == exam_id && s.is_exam) else {
            return Vec::new();
        };
        let mut section: Vec<StageId> = self.stages[..pos]
            .iter()
            .rev()
            .take_while(|s| !s.is_exam)
            .map(|s| s.id)
            .collect();
        section.reverse();
        section
    }

    /// The closest exam with an id lower than `id`.
    pub fn previous_exam(&self, id: StageId) -> Option<&StageDefinition> {
        self.exams().filter(|e| e.id < id).last()
    }
}

/// The validated mission list, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MissionCatalog {
    missions: Vec<MissionDefinition>,
}

impl MissionCatalog {
    pub fn new(missions: Vec<MissionDefinition>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        let mut legacy = None;
        let mut grouped = None;

        for mission in &missions {
            if !ids.insert(&mission.id) {
                return Err(CatalogError::DuplicateMission(mission.id.clone()));
            }
            if !mission.kind.is_flag() && mission.target.is_none() {
                return Err(CatalogError::MissingTarget {
                    id: mission.id.clone(),
                    kind: mission.kind,
                });
            }
            match mission.kind.schema() {
                MissionSchema::Legacy => legacy = legacy.or(Some(mission.kind)),
                MissionSchema::Grouped => grouped = grouped.or(Some(mission.kind)),
                MissionSchema::Shared => {}
            }
        }

        if let (Some(legacy), Some(grouped)) = (legacy, grouped) {
            return Err(CatalogError::MixedSchemas { legacy, grouped });
        }

        Ok(Self { missions })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let missions: Vec<MissionDefinition> = serde_json::from_str(json)?;
        Self::new(missions)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        let missions: Vec<MissionDefinition> = serde_json::from_slice(bytes)?;
        Self::new(missions)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MissionDefinition> {
        self.missions.iter()
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    pub fn uses_legacy_schema(&self) -> bool {
        self.missions.iter().any(|m| m.kind.schema() == MissionSchema::Legacy)
    }
}
