//! Reporting sink for scan events. Passed by reference into the coordinator; purely observational.

use log::{debug, error, info, warn};
use std::path::Path;

use crate::FileOutcome;
use crate::engine::progress::{ProgressBar, create_counter, update_progress_bar};

/// Observer for a scan run. Called from the coordinator thread only, so
/// implementations need `Sync` but never see concurrent calls.
pub trait ScanReporter: Sync {
    fn init(&self, _directories: &[&Path], _file_pattern: &str, _num_threads: usize) {}
    fn directory_start(&self, _dir: &Path) {}
    fn directory_unavailable(&self, _dir: &Path, _message: &str) {}
    fn file_submitted(&self, _path: &Path) {}
    /// Called once per candidate, success or failure.
    fn file_finished(&self, _outcome: &FileOutcome) {}
    fn finished(&self, _unique_identifiers: usize, _files: usize, _cancelled: bool) {}
}

/// Drops every event.
pub struct NoopReporter;

impl ScanReporter for NoopReporter {}

/// Forwards events to the `log` facade.
pub struct LogReporter;

impl ScanReporter for LogReporter {
    fn init(&self, directories: &[&Path], file_pattern: &str, num_threads: usize) {
        info!(
            "Scanning {} directories {:?} for files matching `{}` with {} workers",
            directories.len(),
            directories,
            file_pattern,
            num_threads
        );
    }

    fn directory_start(&self, dir: &Path) {
        debug!("Listing {}", dir.display());
    }

    fn directory_unavailable(&self, dir: &Path, message: &str) {
        warn!("Skipping directory {}: {}", dir.display(), message);
    }

    fn file_submitted(&self, path: &Path) {
        debug!("Submitted {}", path.display());
    }

    fn file_finished(&self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Success {
                path,
                lines_processed,
            } => info!(
                "Processed file: {} with {} lines",
                path.display(),
                lines_processed
            ),
            FileOutcome::Failure {
                path,
                kind,
                message,
            } => error!(
                "Error processing file {} ({}): {}",
                path.display(),
                kind,
                message
            ),
        }
    }

    fn finished(&self, unique_identifiers: usize, files: usize, cancelled: bool) {
        if cancelled {
            warn!("Scan stopped early; results are partial");
        }
        info!(
            "Found {} unique identifiers across {} files",
            unique_identifiers, files
        );
    }
}

/// [`LogReporter`] plus a file counter on stderr (verbose CLI).
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: create_counter("Scanning"),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanReporter for ProgressReporter {
    fn init(&self, directories: &[&Path], file_pattern: &str, num_threads: usize) {
        LogReporter.init(directories, file_pattern, num_threads);
    }

    fn directory_start(&self, dir: &Path) {
        LogReporter.directory_start(dir);
    }

    fn directory_unavailable(&self, dir: &Path, message: &str) {
        LogReporter.directory_unavailable(dir, message);
    }

    fn file_submitted(&self, path: &Path) {
        LogReporter.file_submitted(path);
    }

    fn file_finished(&self, outcome: &FileOutcome) {
        update_progress_bar(&self.bar, 1);
        LogReporter.file_finished(outcome);
    }

    fn finished(&self, unique_identifiers: usize, files: usize, cancelled: bool) {
        eprintln!();
        LogReporter.finished(unique_identifiers, files, cancelled);
    }
}
