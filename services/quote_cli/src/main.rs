//! StableSwap Quote CLI
//!
//! Runs a single pool calculation from the command line and prints the
//! result as a digit string on stdout. Logs go to stderr.
//!
//! ```text
//! stableswap out-given-in \
//!     --reserves '[{"asset_id":0,"amount":"1000000000000","decimals":12},
//!                  {"asset_id":1,"amount":"1000000000000","decimals":12}]' \
//!     -A 1 --asset-in 0 --asset-out 1 --amount 1000000000
//! 999500248
//! ```

mod commands;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use stableswap_codec::StableSwapCodec;
use stableswap_config::StableSwapConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "stableswap")]
#[command(about = "Exact StableSwap pool quotes")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overrides the configured level (RUST_LOG still wins)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level '{level}'"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings =
        StableSwapConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let level = cli.log_level.as_deref().unwrap_or(&settings.logging.level);
    init_tracing(level, settings.logging.json)?;

    let limits = settings.solver.limits()?;
    info!(
        "Solver limits: D {} / y {} iterations",
        limits.max_d_iterations, limits.max_y_iterations
    );

    let output = cli.command.run(&StableSwapCodec::new(limits))?;
    println!("{output}");
    Ok(())
}
