use log::warn;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::thread::ScopedJoinHandle;

use crate::{FileErrorKind, FileOutcome};

/// Join scan workers after the outcome channel has drained. Scan panics are already
/// caught per file, so a failed join is logged, not propagated.
pub fn shutdown_scan_workers(worker_handles: Vec<ScopedJoinHandle<'_, ()>>) {
    for h in worker_handles {
        let name = h.thread().name().unwrap_or("scan worker").to_string();
        if h.join().is_err() {
            log::error!("{} panicked outside a file scan", name);
        }
    }
}

/// Failure counts per kind, in a stable order.
pub fn failure_counts(outcomes: &[FileOutcome]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for kind in outcomes.iter().filter_map(FileOutcome::error_kind) {
        *counts.entry(kind.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Log a one-line summary of skipped directories and failed files.
pub fn summarize_outcomes(outcomes: &[FileOutcome], unavailable_dirs: &[(PathBuf, String)]) {
    if !unavailable_dirs.is_empty() {
        warn!(
            "Skipped {} directories that could not be listed",
            unavailable_dirs.len()
        );
    }
    let counts = failure_counts(outcomes);
    if counts.is_empty() {
        return;
    }
    let total: usize = counts.values().sum();
    let detail = counts
        .iter()
        .map(|(kind, n)| format!("{kind}={n}"))
        .collect::<Vec<_>>()
        .join(", ");
    warn!("{} of {} files failed ({})", total, outcomes.len(), detail);
    if counts.contains_key(FileErrorKind::Cancelled.as_str()) {
        warn!("Some files were not scanned because the run was stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_counts() {
        let outcomes = vec![
            FileOutcome::Success {
                path: PathBuf::from("a"),
                lines_processed: 1,
            },
            FileOutcome::failure(
                &PathBuf::from("b"),
                FileErrorKind::NotFound,
                "No such file",
            ),
            FileOutcome::failure(&PathBuf::from("c"), FileErrorKind::NotFound, "gone"),
            FileOutcome::failure(&PathBuf::from("d"), FileErrorKind::Cancelled, "stopped"),
        ];
        let counts = failure_counts(&outcomes);
        assert_eq!(counts.get("not_found"), Some(&2));
        assert_eq!(counts.get("cancelled"), Some(&1));
        assert_eq!(counts.len(), 2);
    }
}
