//! Load `logsift.toml` (CLI only). The lib takes a resolved [`ScanOpts`](crate::ScanOpts) and never reads it.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ScanConfig;
use crate::error::{Result, ScanError};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LogsiftToml {
    #[serde(default)]
    paths: PathsSection,
    #[serde(default)]
    settings: SettingsSection,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
struct PathsSection {
    log_directories: Option<Vec<String>>,
    output_csv: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    file_pattern: Option<String>,
    threads: Option<usize>,
    timeout_secs: Option<u64>,
    rules: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingSection {
    log_filename: Option<String>,
    log_level: Option<String>,
}

pub(crate) fn parse_logsift_toml(s: &str, origin: &Path) -> Result<LogsiftToml> {
    toml::from_str(s).map_err(|e| ScanError::Config(format!("{}: {}", origin.display(), e)))
}

/// Load the config file. A missing file at the default location is not an error (`Ok(None)`);
/// a missing file that was asked for explicitly, or one that does not parse, is.
pub(crate) fn load_logsift_toml(path: &Path, explicit: bool) -> Result<Option<LogsiftToml>> {
    match std::fs::read_to_string(path) {
        Ok(s) => parse_logsift_toml(&s, path).map(Some),
        Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ScanError::Config(format!("{}: {}", path.display(), e))),
    }
}

/// Overwrite config field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $cfg:expr, $field:ident => $cfg_field:ident) => {
        if let Some(ref v) = $section.$field {
            $cfg.$cfg_field = v.clone().into();
        }
    };
}

/// Apply file values to `cfg` (only fields present in the file). Call before applying CLI flags.
pub(crate) fn apply_file_to_config(file: &LogsiftToml, cfg: &mut ScanConfig) {
    if let Some(ref dirs) = file.paths.log_directories {
        cfg.directories = dirs.iter().map(PathBuf::from).collect();
    }
    apply_file_opt!(file.paths, cfg, output_csv => output_path);
    apply_file_opt!(file.settings, cfg, file_pattern => file_pattern);
    if let Some(n) = file.settings.threads {
        cfg.num_threads = Some(n);
    }
    if let Some(secs) = file.settings.timeout_secs {
        cfg.timeout = Some(Duration::from_secs(secs));
    }
    if let Some(ref rules) = file.settings.rules {
        cfg.rules = Some(rules.clone());
    }
    if let Some(ref p) = file.logging.log_filename {
        cfg.log_file = Some(PathBuf::from(p));
    }
    if let Some(ref l) = file.logging.log_level {
        cfg.log_level = Some(l.clone());
    }
}
