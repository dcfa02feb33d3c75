use colored::Colorize;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Crate log level: explicit level wins, else Debug when verbose, else Info.
pub fn resolve_level(verbose: bool, level: Option<LevelFilter>) -> LevelFilter {
    match level {
        Some(l) => l,
        None if verbose => LevelFilter::Debug,
        None => LevelFilter::Info,
    }
}

/// Parse a level name (`"debug"`, `"INFO"`, ...). Unknown names yield `None`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse::<LevelFilter>().ok()
}

/// Install the global logger. With `log_file`, output goes to that file (truncated) without colors.
pub fn setup_logging(
    verbose: bool,
    level: Option<LevelFilter>,
    log_file: Option<&Path>,
) -> io::Result<()> {
    let level = resolve_level(verbose, level);
    let mut builder = Builder::from_default_env();
    builder
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), level);

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            colored::control::set_override(false);
            builder
                .target(Target::Pipe(Box::new(file)))
                .format(|buf, record| {
                    writeln!(
                        buf,
                        "{} - {} - {}",
                        buf.timestamp_seconds(),
                        record.level(),
                        record.args()
                    )
                });
        }
        None => {
            builder.format(|buf, record| {
                let name = env!("CARGO_PKG_NAME");
                let line = match record.level() {
                    Level::Error | Level::Warn => {
                        let level_str = match record.level() {
                            Level::Warn => "WARN".yellow(),
                            Level::Error => "ERROR".red(),
                            _ => unreachable!(),
                        };
                        let path = record.target().to_string().white();
                        format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                    }
                    _ => format!("[{}] {}", name.cyan(), record.args()),
                };
                writeln!(buf, "{}", line)
            });
        }
    }
    builder.init();
    Ok(())
}
