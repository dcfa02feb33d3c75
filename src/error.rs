//! Error types for the scan engine and its sinks.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the library. Per-file read failures are not here: they are
/// recorded as [`FileOutcome::Failure`](crate::FileOutcome) and never abort a run.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Configured directory is missing, not a directory, or unreadable. Recovered by the coordinator.
    #[error("directory unavailable: {}: {message}", dir.display())]
    DirectoryUnavailable { dir: PathBuf, message: String },

    /// Worker pool could not be started. The only fatal condition of a run.
    #[error("failed to start worker pool: {0}")]
    PoolStart(#[source] io::Error),

    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule `{pattern}` must have exactly one capture group, found {found}")]
    RuleCaptureGroups { pattern: String, found: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, ScanError>;
