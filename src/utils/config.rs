//! Application configuration constants.
//! Tuning and defaults in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived file names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!("{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Config file looked up in the working directory when `--config` is not given.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Defaults ----

pub struct Defaults;

impl Defaults {
    pub const FILE_PATTERN: &'static str = r".*\.log";
    pub const OUTPUT_CSV: &'static str = "extracted_user_codes.csv";
    /// Header of the single output column.
    pub const CSV_COLUMN: &'static str = "userIdentifier";
}

// ---- Worker threads ----

/// Thread limits for the scan pool.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
}

impl WorkerThreadLimits {
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
        }
    }
}

// ---- Channels ----

pub struct ChannelCaps;

impl ChannelCaps {
    /// Candidate channel slots per worker. Bounds queued paths for very large worklists.
    pub const CANDIDATES_PER_WORKER: usize = 64;
}

// ---- Scanning ----

/// Lines read between stop-condition checks inside one file.
pub const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Initial line buffer capacity (bytes).
pub const LINE_BUF_CAPACITY: usize = 8 * 1024;
