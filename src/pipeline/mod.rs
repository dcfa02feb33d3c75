//! Pipeline components: context, directory listing, per-file scan, coordinator, reporting.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod scanner;
pub mod walk;

pub use context::{
    PipelineChannels, PipelineContext, PipelineTuning, StopCondition, create_pipeline_channels,
};
pub use error_handler::{failure_counts, shutdown_scan_workers, summarize_outcomes};
pub use orchestrator::run_scan;
pub use scanner::{decode_line, scan_file};
pub use walk::{FilePattern, list_candidates};
