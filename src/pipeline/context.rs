//! Pipeline context and tuning: shared state handed to every scan worker.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::extract::IdentifierExtractor;
use crate::utils::config::{ChannelCaps, WorkerThreadLimits};
use crate::utils::fd_limit::{cap_workers, max_workers_by_fd_limit};
use crate::{CandidatePath, FileOutcome, IdentifierSet, ScanOpts};

/// Worker count and channel capacity for one run.
#[derive(Clone, Debug)]
pub struct PipelineTuning {
    pub num_threads: usize,
    pub channel_cap: usize,
}

impl PipelineTuning {
    /// Requested (or available) threads, capped by the FD limit.
    pub fn from_opts(opts: &ScanOpts) -> Self {
        let requested = opts
            .num_threads
            .unwrap_or_else(|| WorkerThreadLimits::current().all_threads);
        let num_threads = cap_workers(requested, max_workers_by_fd_limit());
        Self {
            num_threads,
            channel_cap: num_threads * ChannelCaps::CANDIDATES_PER_WORKER,
        }
    }
}

/// When a run should stop early: deadline, external flag, or neither.
#[derive(Clone, Debug, Default)]
pub struct StopCondition {
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl StopCondition {
    pub fn new(timeout: Option<Duration>, cancel: Option<Arc<AtomicBool>>) -> Self {
        Self {
            deadline: timeout.map(|t| Instant::now() + t),
            cancel,
        }
    }

    pub fn from_opts(opts: &ScanOpts) -> Self {
        Self::new(opts.timeout, opts.cancel.clone())
    }

    pub fn should_stop(&self) -> bool {
        if let Some(flag) = &self.cancel
            && flag.load(Ordering::Relaxed)
        {
            return true;
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Read-only state shared by reference with every scan worker. The set is the only
/// thing workers mutate.
pub struct PipelineContext<'a> {
    pub extractor: &'a IdentifierExtractor,
    pub identifiers: &'a IdentifierSet,
    pub stop: StopCondition,
}

/// Candidate channel (bounded) and outcome channel (unbounded so workers never
/// block while the coordinator is still submitting).
pub struct PipelineChannels {
    pub candidate_tx: Sender<CandidatePath>,
    pub candidate_rx: Receiver<CandidatePath>,
    pub outcome_tx: Sender<FileOutcome>,
    pub outcome_rx: Receiver<FileOutcome>,
}

pub fn create_pipeline_channels(channel_cap: usize) -> PipelineChannels {
    let (candidate_tx, candidate_rx) = bounded::<CandidatePath>(channel_cap.max(1));
    let (outcome_tx, outcome_rx) = unbounded::<FileOutcome>();
    PipelineChannels {
        candidate_tx,
        candidate_rx,
        outcome_tx,
        outcome_rx,
    }
}
