//! Versioned load of persisted progress.
//!
//! | found | result |
//! |---|---|
//! | current record (any version ≤ 2) | parsed; missing fields take `ProgressState` defaults |
//! | no current record, v1 stats and/or cleared list | upgraded via [`LegacyStats::upgrade`] |
//! | nothing | fresh state |
//! | unreadable or corrupt current record | fresh state, logged |

use progress_data::{
    LegacyProgress, LegacyStats, ProgressState, CURRENT_SCHEMA_VERSION, LEGACY_PROGRESS_KEY,
    LEGACY_STATS_KEY, PROGRESS_KEY,
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::storage::Storage;

pub fn load_progress(storage: &dyn Storage) -> ProgressState {
    match storage.read(PROGRESS_KEY) {
        Ok(Some(raw)) => return parse_current(&raw),
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, "progress unreadable, starting fresh");
            return ProgressState::default();
        }
    }

    load_legacy(storage).unwrap_or_default()
}

fn parse_current(raw: &str) -> ProgressState {
    match serde_json::from_str::<ProgressState>(raw) {
        Ok(mut state) => {
            if state.schema_version > CURRENT_SCHEMA_VERSION {
                warn!(
                    found = state.schema_version,
                    supported = CURRENT_SCHEMA_VERSION,
                    "progress written by a newer build; unknown fields are dropped"
                );
            }
            state.schema_version = CURRENT_SCHEMA_VERSION;
            state
        }
        Err(e) => {
            warn!(error = %e, "progress record is corrupt, starting fresh");
            ProgressState::default()
        }
    }
}

fn load_legacy(storage: &dyn Storage) -> Option<ProgressState> {
    let stats: Option<LegacyStats> = read_part(storage, LEGACY_STATS_KEY);
    let progress: Option<LegacyProgress> = read_part(storage, LEGACY_PROGRESS_KEY);
    if stats.is_none() && progress.is_none() {
        return None;
    }

    let state = stats.unwrap_or_default().upgrade(progress.unwrap_or_default());
    info!(
        total_plays = state.total_plays,
        cleared = state.legacy_cleared.len(),
        "migrated v1 progress"
    );
    Some(state)
}

// A present-but-corrupt part counts as present with defaults.
fn read_part<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> Option<T> {
    match storage.read(key) {
        Ok(Some(raw)) => Some(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "legacy record is corrupt, using defaults");
            T::default()
        })),
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "legacy record unreadable");
            None
        }
    }
}
