//! Public and internal types for the logsift API and pipeline.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A file discovered during listing, paired with the configured directory it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidatePath {
    pub path: PathBuf,
    pub source_dir: PathBuf,
}

/// Why a single file could not be (fully) scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileErrorKind {
    NotFound,
    PermissionDenied,
    IsDirectory,
    /// Any other open/read failure.
    Read,
    /// The run's deadline or interrupt fired before or during this file.
    Cancelled,
}

impl FileErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileErrorKind::NotFound => "not_found",
            FileErrorKind::PermissionDenied => "permission_denied",
            FileErrorKind::IsDirectory => "is_directory",
            FileErrorKind::Read => "read_error",
            FileErrorKind::Cancelled => "cancelled",
        }
    }
}

impl From<&io::Error> for FileErrorKind {
    fn from(e: &io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => FileErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => FileErrorKind::PermissionDenied,
            io::ErrorKind::IsADirectory => FileErrorKind::IsDirectory,
            _ => FileErrorKind::Read,
        }
    }
}

impl std::fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-file result. Failures are informational only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileOutcome {
    Success {
        path: PathBuf,
        lines_processed: usize,
    },
    Failure {
        path: PathBuf,
        kind: FileErrorKind,
        message: String,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Success { path, .. } | FileOutcome::Failure { path, .. } => path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Success { .. })
    }

    /// Error kind for failures, `None` on success.
    pub fn error_kind(&self) -> Option<FileErrorKind> {
        match self {
            FileOutcome::Success { .. } => None,
            FileOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub(crate) fn failure(path: &Path, kind: FileErrorKind, message: impl Into<String>) -> Self {
        FileOutcome::Failure {
            path: path.to_path_buf(),
            kind,
            message: message.into(),
        }
    }
}

/// The shared, deduplicated identifier set. Every insert goes through the mutex,
/// so workers on any thread can write concurrently without losing elements.
#[derive(Debug, Default)]
pub struct IdentifierSet {
    inner: Mutex<HashSet<String>>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Insert-only data: a panic in another holder cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert one identifier. Returns true if it was not already present.
    pub fn insert(&self, id: impl Into<String>) -> bool {
        self.lock().insert(id.into())
    }

    /// Insert a batch under a single lock acquisition.
    pub fn extend<I>(&self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut ids = ids.into_iter().peekable();
        if ids.peek().is_none() {
            return;
        }
        self.lock().extend(ids);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Consume the set once all writers are done.
    pub fn into_inner(self) -> HashSet<String> {
        self.inner
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Identifiers in ascending order, for reproducible output.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().iter().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

/// Result of a complete (or cancelled) run.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub identifiers: IdentifierSet,
    /// Exactly one entry per dispatched candidate, in completion order. A scan that
    /// panics is recorded as a `Read` failure.
    pub outcomes: Vec<FileOutcome>,
    /// Configured directories that could not be listed, with the reason.
    pub unavailable_dirs: Vec<(PathBuf, String)>,
    /// True when the deadline or interrupt fired during the run.
    pub cancelled: bool,
}

impl ScanReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Options for [`scan_dirs`](crate::scan_dirs).
#[derive(Clone, Debug, Default)]
pub struct ScanOpts {
    /// Worker count. When None, uses available parallelism; always capped by the FD limit.
    pub num_threads: Option<usize>,
    /// Stop dispatching and scanning after this long; completed outcomes are still returned.
    pub timeout: Option<Duration>,
    /// External stop flag (e.g. wired to Ctrl-C). Checked before each file and periodically within one.
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Fully resolved run configuration (CLI). Precedence: defaults < config file < flags.
#[derive(Clone, Debug)]
pub struct ScanConfig {
    pub directories: Vec<PathBuf>,
    /// Regex matched against the whole file name.
    pub file_pattern: String,
    pub output_path: PathBuf,
    pub num_threads: Option<usize>,
    pub timeout: Option<Duration>,
    /// Extraction rule patterns; `None` uses the built-in rules.
    pub rules: Option<Vec<String>>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub verbose: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        use crate::utils::config::Defaults;
        Self {
            directories: Vec::new(),
            file_pattern: Defaults::FILE_PATTERN.to_string(),
            output_path: PathBuf::from(Defaults::OUTPUT_CSV),
            num_threads: None,
            timeout: None,
            rules: None,
            log_file: None,
            log_level: None,
            verbose: false,
        }
    }
}

impl From<&ScanConfig> for ScanOpts {
    fn from(c: &ScanConfig) -> Self {
        ScanOpts {
            num_threads: c.num_threads,
            timeout: c.timeout,
            cancel: None,
        }
    }
}
