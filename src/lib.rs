//! Logsift: concurrent log scanner that extracts and deduplicates user identifiers.

pub mod engine;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod report;
pub mod sink;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{Result, ScanError};
pub use extract::{ExtractionRule, IdentifierExtractor};
pub use pipeline::FilePattern;
pub use report::{LogReporter, NoopReporter, ScanReporter};
pub use sink::save_to_csv;

use log::debug;
use std::path::PathBuf;

use crate::utils::config::PackagePaths;

/// Single entry point: scan the immediate entries of each directory whose file name fully
/// matches `file_pattern`, using the built-in extraction rules.
///
/// Directories are listed in order; missing ones are reported and skipped. Every matching
/// file gets exactly one [`FileOutcome`] in the report. The only error after argument
/// validation is [`ScanError::PoolStart`].
///
/// ```ignore
/// let report = logsift::scan_dirs(&[dir.into()], r".*\.log", &ScanOpts::default(), &NoopReporter)?;
/// println!("{} unique ids", report.identifiers.len());
/// ```
pub fn scan_dirs(
    directories: &[PathBuf],
    file_pattern: &str,
    opts: &ScanOpts,
    reporter: &dyn ScanReporter,
) -> Result<ScanReport> {
    scan_dirs_with(
        directories,
        file_pattern,
        &IdentifierExtractor::default(),
        opts,
        reporter,
    )
}

/// Like [`scan_dirs`], with caller-supplied extraction rules.
pub fn scan_dirs_with(
    directories: &[PathBuf],
    file_pattern: &str,
    extractor: &IdentifierExtractor,
    opts: &ScanOpts,
    reporter: &dyn ScanReporter,
) -> Result<ScanReport> {
    let pattern = FilePattern::new(file_pattern)?;
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );
    debug!(
        "Extraction rules: {:?}",
        extractor
            .rules()
            .iter()
            .map(|r| (r.name(), r.pattern()))
            .collect::<Vec<_>>()
    );
    pipeline::run_scan(directories, &pattern, extractor, opts, reporter)
}
