//! Logsift CLI: scan log directories and export distinct user identifiers to CSV.

use anyhow::Result;
use clap::Parser;
use logsift::engine::{Cli, handle_run};
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
