//! Centralized error types for convlist.
//!
//! The threading engine itself never fails: malformed structure is clipped
//! and unknown records are ignored. Errors only come from the edges that
//! touch the filesystem (batch files, configuration).

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the convlist library.
#[derive(Error, Debug)]
pub enum ConvlistError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified batch file does not exist.
    #[error("Batch file not found: {0}")]
    FileNotFound(PathBuf),

    /// The batch file is not a JSON array of message records.
    #[error("Invalid record batch in '{path}': {reason}")]
    InvalidBatch { path: PathBuf, reason: String },

    /// The configuration file could not be parsed.
    #[error("Invalid configuration in '{path}': {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// A load completed after a newer load superseded it.
    #[error("Load #{ticket} was superseded by load #{current}")]
    StaleLoad { ticket: u64, current: u64 },
}

/// Convenience alias for `Result<T, ConvlistError>`.
pub type Result<T> = std::result::Result<T, ConvlistError>;

impl ConvlistError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (rare, prefer `ConvlistError::io`).
impl From<std::io::Error> for ConvlistError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
