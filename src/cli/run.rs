//! Handler for the `run` command.

use tracing::info;

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::runtime;

/// Load the config and apply CLI overrides. Overrides are validated like
/// file values.
#[allow(clippy::result_large_err)]
pub fn resolve_config(args: &RunArgs) -> Result<Config> {
    let mut config = Config::load(&args.config)?;

    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if let Some(interval) = args.interval_secs {
        config.strategy.interval_secs = interval;
    }
    if args.dry_run {
        config.dry_run = true;
    }

    config.validate()?;
    Ok(config)
}

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = resolve_config(args)?;
    config.init_logging();

    if config.dry_run {
        info!("Dry-run mode enabled - openings are logged, no orders are placed");
    }
    info!(
        markets = ?config.strategy.markets,
        interval_secs = config.strategy.interval_secs,
        "fundarb starting"
    );

    runtime::run_until_interrupted(config).await
}
