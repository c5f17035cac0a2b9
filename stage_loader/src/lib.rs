use std::{fs, path::Path};

use anyhow::Context;
use stage_schema::{MissionCatalog, StageCatalog};

pub fn load_stages_from_path(path: impl AsRef<Path>) -> anyhow::Result<StageCatalog> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read stages: {}", path.display()))?;
    let stages = StageCatalog::from_json_slice(&bytes)
        .with_context(|| format!("failed to parse stages json: {}", path.display()))?;
    Ok(stages)
}

pub fn load_stages_from_str(json: &str) -> anyhow::Result<StageCatalog> {
    let stages = StageCatalog::from_json_str(json).context("failed to parse stages json")?;
    Ok(stages)
}

pub fn load_missions_from_path(path: impl AsRef<Path>) -> anyhow::Result<MissionCatalog> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).with_context(|| format!("failed to read missions: {}", path.display()))?;
    let missions = MissionCatalog::from_json_slice(&bytes)
        .with_context(|| format!("failed to parse missions json: {}", path.display()))?;
    Ok(missions)
}

pub fn load_missions_from_str(json: &str) -> anyhow::Result<MissionCatalog> {
    let missions = MissionCatalog::from_json_str(json).context("failed to parse missions json")?;
    Ok(missions)
}
