//! Handler for `fundarb check config`.

use std::path::Path;

use crate::cli::output;
use crate::config::{Config, TelegramAppConfig};
use crate::error::Result;

/// Validate configuration file without starting the engine.
#[allow(clippy::result_large_err)]
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    let strategy = &config.strategy;
    output::section("Summary");
    output::field("Network", if config.testnet { "testnet" } else { "mainnet" });
    output::field("Dry run", config.dry_run);
    output::field("Markets", strategy.markets.join(", "));
    output::field("Threshold", strategy.min_funding_rate_diff);
    output::field("Size", format!("{} USD", strategy.position_size_usd));
    output::field("Max total", format!("{} USD", strategy.max_position_usd));
    output::field("Interval", format!("{}s", strategy.interval_secs));
    output::field("Timeout", format!("{}s", strategy.call_timeout_secs));

    output::section("Venues");
    for (slot, venue) in [("A", &config.venues.a), ("B", &config.venues.b)] {
        output::field(slot, format!("{} ({})", venue.name, venue.kind.as_str()));
        if venue.api_key.is_some() {
            output::success(&format!("{} detected", venue.api_key_var()));
        } else {
            output::warning(&format!(
                "{} not set (authenticated endpoints unavailable)",
                venue.api_key_var()
            ));
        }
    }

    let unpriced = config.unpriced_markets();
    if unpriced.is_empty() {
        output::success("Reference price configured for every market");
    } else {
        for market in unpriced {
            output::warning(&format!(
                "No reference price for {market}; openings will be refused"
            ));
        }
    }

    if config.telegram.enabled {
        if TelegramAppConfig::credentials_present() {
            output::success("Telegram integration configured");
        } else {
            output::warning("Telegram enabled but environment variables are missing");
            output::note("set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID");
        }
    } else {
        output::field("Telegram", "disabled");
    }

    output::success("Configuration check complete");

    Ok(())
}
