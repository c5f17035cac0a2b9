//! Game configuration.
//!
//! Read from a TOML file; a missing file means all defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cosmetics::CosmeticPolicy;
use crate::error::ConfigError;
use crate::gate::GateMode;
use crate::time::TimingRule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Stage list JSON
    #[serde(default = "default_stages_path")]
    pub stages_path: PathBuf,

    /// Mission list JSON
    #[serde(default = "default_missions_path")]
    pub missions_path: PathBuf,

    /// Directory holding one file per storage key
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    #[serde(default)]
    pub gate: GateMode,

    #[serde(default)]
    pub timing_rule: TimingRule,

    #[serde(default)]
    pub cosmetics: CosmeticPolicy,

    /// Seconds past the target after which a running attempt stops itself
    #[serde(default = "default_auto_stop_grace")]
    pub auto_stop_grace_secs: f64,
}

fn default_stages_path() -> PathBuf {
    PathBuf::from("data/stages-grouped.json")
}

fn default_missions_path() -> PathBuf {
    PathBuf::from("data/missions.json")
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".timer-game")
}

fn default_auto_stop_grace() -> f64 {
    5.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            stages_path: default_stages_path(),
            missions_path: default_missions_path(),
            storage_dir: default_storage_dir(),
            gate: GateMode::default(),
            timing_rule: TimingRule::default(),
            cosmetics: CosmeticPolicy::default(),
            auto_stop_grace_secs: default_auto_stop_grace(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        if !(config.auto_stop_grace_secs.is_finite() && config.auto_stop_grace_secs >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "auto_stop_grace_secs must be non-negative, got {}",
                config.auto_stop_grace_secs
            )));
        }
        Ok(config)
    }

    /// Relative paths inside the file resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for p in [&mut self.stages_path, &mut self.missions_path, &mut self.storage_dir] {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }
}
