//! Error types.

use std::io;
use thiserror::Error;

/// Result type for fallible scope trainer operations.
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Errors raised outside the core, when reading configuration or commands.
///
/// Sampling, generation and validation never fail: bad input is clamped or reported as a failed
/// answer instead.
#[derive(Error, Debug)]
pub enum ScopeError {
    /// The configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] io::Error),

    /// The configuration file is not valid JSON for a session configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Unknown metric '{0}'")]
    UnknownMetric(String),

    #[error("Unknown difficulty '{0}', expected easy, medium or hard")]
    UnknownDifficulty(String),

    /// A command line the text session could not understand
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}
