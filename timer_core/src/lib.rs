//! Core of the stop-the-timer game: stopwatch, verdicts, progress,
//! missions and stage gating.

pub mod config;
pub mod cosmetics;
pub mod error;
pub mod gameplay;
pub mod gate;
pub mod mission;
pub mod progress;
pub mod time;

pub use config::GameConfig;
pub use error::{ConfigError, SessionError};
pub use gameplay::session::{AttemptReport, AttemptView, GameSession, StopOutcome, Tick};
