//! Diskscout CLI: copy files matching an extension into a destination directory.

use anyhow::Result;
use clap::Parser;
use diskscout::engine::Cli;
use diskscout::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
