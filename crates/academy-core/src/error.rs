//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Player input or a requested transition was rejected.
    #[error("validation error: {0}")]
    Validation(String),

    /// No level module is registered for the requested index.
    #[error("level module not found: {0}")]
    ModuleNotFound(u32),

    /// A level module exists but could not be constructed.
    #[error("level module {level} failed to load: {reason}")]
    ModuleLoad {
        /// The level index that failed.
        level: u32,
        /// Why construction failed.
        reason: String,
    },

    /// The progress store could not be read or written.
    #[error("persistence error: {0}")]
    Persistence(String),
}
