//! CLI command handler: resolve config, scan, write CSV.

use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::engine::arg_parser::Cli;
use crate::extract::IdentifierExtractor;
use crate::report::{LogReporter, ProgressReporter, ScanReporter};
use crate::sink::save_to_csv;
use crate::utils::config::PackagePaths;
use crate::utils::logsift_toml::{apply_file_to_config, load_logsift_toml};
use crate::utils::{parse_level, setup_logging};
use crate::{ScanConfig, ScanOpts, scan_dirs_with};

/// Overwrite config field from a flag when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $cfg:expr, $field:ident => $cfg_field:ident) => {
        if let Some(ref v) = $cli.$field {
            $cfg.$cfg_field = v.clone().into();
        }
    };
}

/// Apply flags over `cfg`. Positional directories replace configured ones when any are given.
pub fn apply_cli_to_config(cli: &Cli, cfg: &mut ScanConfig) {
    if !cli.directories.is_empty() {
        cfg.directories = cli.directories.clone();
    }
    apply_cli_opt!(cli, cfg, pattern => file_pattern);
    apply_cli_opt!(cli, cfg, output => output_path);
    if let Some(n) = cli.threads {
        cfg.num_threads = Some(n);
    }
    if let Some(secs) = cli.timeout {
        cfg.timeout = Some(Duration::from_secs(secs));
    }
    if !cli.rules.is_empty() {
        cfg.rules = Some(cli.rules.clone());
    }
    if let Some(ref p) = cli.log_file {
        cfg.log_file = Some(p.clone());
    }
    if let Some(ref l) = cli.log_level {
        cfg.log_level = Some(l.clone());
    }
    if let Some(v) = cli.verbose {
        cfg.verbose = v;
    }
}

/// Defaults < config file < flags.
pub fn resolve_config(cli: &Cli) -> Result<ScanConfig> {
    let (config_path, explicit) = match &cli.config {
        Some(p) => (p.clone(), true),
        None => (PathBuf::from(PackagePaths::get().config_filename()), false),
    };
    let mut cfg = ScanConfig::default();
    if let Some(file) = load_logsift_toml(&config_path, explicit)? {
        apply_file_to_config(&file, &mut cfg);
    }
    apply_cli_to_config(cli, &mut cfg);
    Ok(cfg)
}

fn build_extractor(cfg: &ScanConfig) -> Result<IdentifierExtractor> {
    match &cfg.rules {
        Some(rules) if !rules.is_empty() => {
            IdentifierExtractor::from_patterns(rules.as_slice()).context("invalid extraction rule")
        }
        _ => Ok(IdentifierExtractor::default()),
    }
}

fn install_interrupt_flag() -> Result<Arc<AtomicBool>> {
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_handler = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        cancel_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;
    Ok(cancel)
}

fn check_output_written(output: &Path) {
    if output.exists() {
        info!("CSV file created successfully.");
    } else {
        error!("Failed to create CSV file: {}", output.display());
    }
}

/// Resolve config, scan, and write the CSV. A run in which every file failed still writes
/// a header-only CSV and returns Ok.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let cfg = resolve_config(cli)?;
    let level = match cfg.log_level.as_deref() {
        Some(name) => Some(
            parse_level(name).with_context(|| format!("unknown log level `{name}`"))?,
        ),
        None => None,
    };
    setup_logging(cfg.verbose, level, cfg.log_file.as_deref()).context("open log file")?;

    if cfg.directories.is_empty() {
        warn!("No directories configured; output will contain only the header.");
    }
    let extractor = build_extractor(&cfg)?;
    let opts = ScanOpts {
        cancel: Some(install_interrupt_flag()?),
        ..ScanOpts::from(&cfg)
    };

    // Progress bar writes to stderr; skip it when logging to a file.
    let progress = (cfg.verbose && cfg.log_file.is_none()).then(ProgressReporter::new);
    let reporter: &dyn ScanReporter = match &progress {
        Some(p) => p,
        None => &LogReporter,
    };

    let report = scan_dirs_with(
        &cfg.directories,
        &cfg.file_pattern,
        &extractor,
        &opts,
        reporter,
    )?;

    save_to_csv(&report.identifiers, &cfg.output_path)
        .with_context(|| format!("write CSV to {}", cfg.output_path.display()))?;
    check_output_written(&cfg.output_path);
    info!(
        "Number of unique usernames reported: {}",
        report.identifiers.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("custom.toml");
        std::fs::write(
            &cfg_path,
            "[paths]\nlog_directories = [\"/from/file\"]\noutput_csv = \"file.csv\"\n\
             [settings]\nfile_pattern = 'a\\.log'\nthreads = 2\n",
        )
        .unwrap();
        let cli = Cli::parse_from([
            "logsift",
            "--config",
            cfg_path.to_str().unwrap(),
            "-o",
            "flag.csv",
            "-t",
            "5",
        ]);
        let cfg = resolve_config(&cli).unwrap();
        assert_eq!(cfg.directories, vec![PathBuf::from("/from/file")]);
        assert_eq!(cfg.output_path, PathBuf::from("flag.csv"));
        assert_eq!(cfg.file_pattern, r"a\.log");
        assert_eq!(cfg.num_threads, Some(5));
    }

    #[test]
    fn test_positional_dirs_replace_file_dirs() {
        let mut cfg = ScanConfig {
            directories: vec![PathBuf::from("/from/file")],
            ..Default::default()
        };
        let cli = Cli::parse_from(["logsift", "/x", "/y", "--timeout", "9", "-v"]);
        apply_cli_to_config(&cli, &mut cfg);
        assert_eq!(
            cfg.directories,
            vec![PathBuf::from("/x"), PathBuf::from("/y")]
        );
        assert_eq!(cfg.timeout, Some(Duration::from_secs(9)));
        assert!(cfg.verbose);
    }

    #[test]
    fn test_rule_flag_takes_one_value_per_use() {
        let cli = Cli::parse_from([
            "logsift",
            "--rule",
            r"uid=(\d+)",
            "-r",
            r"sid=(\w+)",
            "/var/log/app",
            "/srv/logs",
        ]);
        assert_eq!(cli.rules, vec![r"uid=(\d+)", r"sid=(\w+)"]);
        assert_eq!(
            cli.directories,
            vec![PathBuf::from("/var/log/app"), PathBuf::from("/srv/logs")]
        );
        let mut cfg = ScanConfig::default();
        apply_cli_to_config(&cli, &mut cfg);
        let ex = build_extractor(&cfg).unwrap();
        assert_eq!(ex.extract("uid=7 sid=abc"), vec!["7", "abc"]);
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let cli = Cli::parse_from(["logsift", "--config", missing.to_str().unwrap()]);
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn test_build_extractor_from_rules() {
        let cfg = ScanConfig {
            rules: Some(vec![r"uid=(\d+)".to_string()]),
            ..Default::default()
        };
        let ex = build_extractor(&cfg).unwrap();
        assert_eq!(ex.extract("uid=7"), vec!["7"]);

        let bad = ScanConfig {
            rules: Some(vec![r"uid=\d+".to_string()]),
            ..Default::default()
        };
        assert!(build_extractor(&bad).is_err());
        assert_eq!(
            build_extractor(&ScanConfig::default()).unwrap().rules().len(),
            2
        );
    }
}
