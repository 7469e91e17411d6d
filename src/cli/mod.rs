//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod rates;
pub mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fundarb - Perpetual funding-rate arbitrage across two venues.
#[derive(Parser, Debug)]
#[command(name = "fundarb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the arbitrage engine (foreground)
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Show a one-shot snapshot of funding rates on both venues
    Rates(ConfigPathArg),
}

/// Subcommands for `fundarb check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Evaluate markets but don't place orders
    #[arg(long)]
    pub dry_run: bool,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Override seconds between evaluation cycles
    #[arg(long)]
    pub interval_secs: Option<u64>,
}
