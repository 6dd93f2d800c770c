//! Command-line entry point.
//!
//! ```bash
//! inflight-clean run --file-a a.csv --file-b b.csv
//! inflight-clean clean --file a.csv
//! inflight-clean explore --file-a a.csv --file-b b.csv
//! inflight-clean init-config
//! ```

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use inflight_clean::config::AppConfig;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    inflight_clean::logging::init(&config.logging)?;

    if let Err(e) = cli::run_command(cli.command, config) {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
