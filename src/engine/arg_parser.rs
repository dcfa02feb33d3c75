use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Scan log directories in parallel and export the distinct user identifiers found to CSV.
#[derive(Clone, Debug, Default, Parser)]
#[command(name = "logsift")]
#[command(about = "Extract distinct user identifiers from log files into a CSV.")]
pub struct Cli {
    /// Directories to scan (non-recursive). Overrides `log_directories` from the config file.
    #[arg(value_name = "DIR")]
    pub directories: Vec<PathBuf>,

    /// Config file. Default: `logsift.toml` in the working directory, if present.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Regex matched against the whole file name. Default: `.*\.log`.
    #[arg(long, short = 'p')]
    pub pattern: Option<String>,

    /// Output CSV path. Default: `extracted_user_codes.csv`.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Worker threads. Default: available parallelism (capped by the open-file limit).
    #[arg(long, short = 't', value_parser = clap::value_parser!(usize))]
    pub threads: Option<usize>,

    /// Stop after this many seconds and write whatever was collected.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub timeout: Option<u64>,

    /// Extraction rule (regex with one capture group). Repeat the flag for more rules;
    /// replaces the built-in rules.
    #[arg(long = "rule", short = 'r', num_args = 1, action = ArgAction::Append)]
    pub rules: Vec<String>,

    /// Write logs to this file (truncated) instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level for this crate (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Verbose output: debug logging and a progress counter.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
