use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::gameplay::session::AttemptReport;
use crate::progress::StorageError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no attempt in progress")]
    NoAttempt,

    #[error("attempt already running")]
    AlreadyRunning,

    #[error("attempt has not started")]
    NotRunning,

    /// The attempt finished and counts in memory, but was not written.
    #[error("result not saved: {source}")]
    Persist {
        report: Box<AttemptReport>,
        #[source]
        source: StorageError,
    },
}
