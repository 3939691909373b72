//! Cadet Academy: startup and runtime errors.

use academy_core::error::GameError;
use thiserror::Error;

/// Startup and runtime errors for the terminal front-end.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The mission catalog or locale tables could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] GameError),

    /// Terminal or file I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
