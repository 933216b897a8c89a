//! Crate error type

use crate::sim::Phase;

/// Errors surfaced by the interaction core
#[derive(Debug, thiserror::Error)]
pub enum TossError {
    /// A gesture operation arrived in a phase that cannot accept it.
    /// This is an integration bug in whatever feeds the controller.
    #[error("cannot {operation} while {phase:?}")]
    InvalidState {
        operation: &'static str,
        phase: Phase,
    },

    /// Settings failed validation
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings JSON could not be parsed or written
    #[error("settings json: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings file could not be read
    #[error("settings io: {0}")]
    Io(#[from] std::io::Error),
}
