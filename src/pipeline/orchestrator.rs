use crossbeam_channel::{Receiver, Sender};
use log::{debug, error};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread::{self, Scope, ScopedJoinHandle};

use crate::error::{Result, ScanError};
use crate::extract::IdentifierExtractor;
use crate::pipeline;
use crate::pipeline::context::{PipelineContext, PipelineTuning, StopCondition};
use crate::pipeline::scanner::scan_file;
use crate::pipeline::walk::{FilePattern, list_candidates};
use crate::report::ScanReporter;
use crate::utils::config::PackagePaths;
use crate::{CandidatePath, FileErrorKind, FileOutcome, IdentifierSet, ScanOpts, ScanReport};

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Run one scan; a panic inside it becomes a `Read` failure for that path so the
/// candidate still gets its outcome.
fn scan_guarded<F>(path: &Path, scan: F) -> FileOutcome
where
    F: FnOnce() -> FileOutcome,
{
    panic::catch_unwind(AssertUnwindSafe(scan)).unwrap_or_else(|payload| {
        let message = format!("scan panicked: {}", panic_message(payload.as_ref()));
        error!("{}: {}", path.display(), message);
        FileOutcome::failure(path, FileErrorKind::Read, message)
    })
}

/// Single scan worker: take candidates until the channel closes, send one outcome each.
fn scan_worker_loop(
    candidate_rx: Receiver<CandidatePath>,
    outcome_tx: Sender<FileOutcome>,
    ctx: &PipelineContext<'_>,
) {
    while let Ok(candidate) = candidate_rx.recv() {
        let outcome = scan_guarded(&candidate.path, || scan_file(&candidate.path, ctx));
        if outcome_tx.send(outcome).is_err() {
            break;
        }
    }
}

/// Spawn `num_threads` scoped workers. If any spawn fails, already-started workers
/// still exit once the caller drops its candidate sender.
fn spawn_scan_workers<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    candidate_rx: &Receiver<CandidatePath>,
    outcome_tx: &Sender<FileOutcome>,
    ctx: &'scope PipelineContext<'env>,
    num_threads: usize,
) -> std::io::Result<Vec<ScopedJoinHandle<'scope, ()>>> {
    (0..num_threads)
        .map(|worker_id| {
            let candidate_rx = candidate_rx.clone();
            let outcome_tx = outcome_tx.clone();
            thread::Builder::new()
                .name(format!("{}-scan-{worker_id}", PackagePaths::get().pkg_name()))
                .spawn_scoped(scope, move || {
                    scan_worker_loop(candidate_rx, outcome_tx, ctx)
                })
        })
        .collect()
}

/// List every directory in order and submit its candidates. Unavailable directories are
/// reported and skipped. Returns the number submitted. Once the run is stopped, candidates
/// are answered with `Cancelled` directly instead of being queued.
fn submit_candidates(
    directories: &[PathBuf],
    pattern: &FilePattern,
    candidate_tx: &Sender<CandidatePath>,
    outcome_tx: &Sender<FileOutcome>,
    stop: &StopCondition,
    reporter: &dyn ScanReporter,
    unavailable_dirs: &mut Vec<(PathBuf, String)>,
) -> usize {
    let mut submitted = 0_usize;
    for dir in directories {
        reporter.directory_start(dir);
        let candidates = match list_candidates(dir, pattern) {
            Ok(c) => c,
            Err(e) => {
                let message = match e {
                    ScanError::DirectoryUnavailable { message, .. } => message,
                    other => other.to_string(),
                };
                reporter.directory_unavailable(dir, &message);
                unavailable_dirs.push((dir.clone(), message));
                continue;
            }
        };
        debug!("{}: {} candidates", dir.display(), candidates.len());
        for candidate in candidates {
            reporter.file_submitted(&candidate.path);
            submitted += 1;
            if stop.should_stop() {
                let _ = outcome_tx.send(FileOutcome::failure(
                    &candidate.path,
                    FileErrorKind::Cancelled,
                    "not started",
                ));
                continue;
            }
            if let Err(err) = candidate_tx.send(candidate) {
                // Every worker is gone; answer for the candidate ourselves.
                let _ = outcome_tx.send(FileOutcome::failure(
                    &err.0.path,
                    FileErrorKind::Cancelled,
                    "no worker available",
                ));
            }
        }
    }
    submitted
}

/// Scan every matching file under `directories` concurrently and merge identifiers.
///
/// Walk (per directory, in order) → candidate channel → worker pool (scan + extract) →
/// shared [`IdentifierSet`]; outcomes come back on a second channel. Returns once every
/// worker has been joined. Per-file failures and unavailable directories are recorded in
/// the report; the only error is [`ScanError::PoolStart`].
pub fn run_scan(
    directories: &[PathBuf],
    pattern: &FilePattern,
    extractor: &IdentifierExtractor,
    opts: &ScanOpts,
    reporter: &dyn ScanReporter,
) -> Result<ScanReport> {
    let tuning = PipelineTuning::from_opts(opts);
    let dir_refs: Vec<&Path> = directories.iter().map(PathBuf::as_path).collect();
    reporter.init(&dir_refs, pattern.as_str(), tuning.num_threads);

    let identifiers = IdentifierSet::new();
    let ctx = PipelineContext {
        extractor,
        identifiers: &identifiers,
        stop: StopCondition::from_opts(opts),
    };
    let channels = pipeline::create_pipeline_channels(tuning.channel_cap);
    let mut outcomes = Vec::new();
    let mut unavailable_dirs = Vec::new();

    thread::scope(|scope| -> Result<()> {
        let workers = spawn_scan_workers(
            scope,
            &channels.candidate_rx,
            &channels.outcome_tx,
            &ctx,
            tuning.num_threads,
        );
        // The coordinator keeps no receiver; workers hold the only clones.
        drop(channels.candidate_rx);
        let workers = match workers {
            Ok(w) => w,
            Err(e) => {
                drop(channels.candidate_tx);
                return Err(ScanError::PoolStart(e));
            }
        };
        debug!("Started {} scan workers", workers.len());

        let submitted = submit_candidates(
            directories,
            pattern,
            &channels.candidate_tx,
            &channels.outcome_tx,
            &ctx.stop,
            reporter,
            &mut unavailable_dirs,
        );
        // Dropping the last senders closes both channels so workers exit and the drain ends.
        drop(channels.candidate_tx);
        drop(channels.outcome_tx);

        while let Ok(outcome) = channels.outcome_rx.recv() {
            reporter.file_finished(&outcome);
            outcomes.push(outcome);
        }
        debug!(
            "outcome channel closed: {} of {} candidates reported",
            outcomes.len(),
            submitted
        );

        pipeline::shutdown_scan_workers(workers);
        Ok(())
    })?;
    // Workers are joined; release the context's borrow of the set.
    drop(ctx);

    let cancelled = outcomes
        .iter()
        .any(|o| o.error_kind() == Some(FileErrorKind::Cancelled));
    pipeline::summarize_outcomes(&outcomes, &unavailable_dirs);
    reporter.finished(identifiers.len(), outcomes.len(), cancelled);

    Ok(ScanReport {
        identifiers,
        outcomes,
        unavailable_dirs,
        cancelled,
    })
}
