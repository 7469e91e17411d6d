//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct. Configuration is loaded from a TOML
//! file; secrets (venue API keys, Telegram credentials) only ever come from
//! environment variables.
//!
//! # Example
//!
//! ```no_run
//! use fundarb::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

mod logging;
mod strategy;
mod telegram;
mod venue;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{MarketId, Price};
use crate::error::{ConfigError, Result};

pub use logging::LoggingConfig;
pub use strategy::StrategyConfig;
pub use telegram::TelegramAppConfig;
pub use venue::{VenueConfig, VenueKind, VenuesConfig};

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Point venues at their test networks.
    #[serde(default)]
    pub testnet: bool,

    /// Evaluate and log openings without placing orders.
    #[serde(default)]
    pub dry_run: bool,

    pub strategy: StrategyConfig,

    pub venues: VenuesConfig,

    /// Reference prices by market, used to size orders.
    #[serde(default)]
    pub prices: BTreeMap<String, Price>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub telegram: TelegramAppConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Venue API keys are read from `<NAME>_API_KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        for venue in [&mut config.venues.a, &mut config.venues.b] {
            venue.api_key = std::env::var(venue.api_key_var())
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// Also run after CLI overrides are applied.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        let strategy = &self.strategy;

        if strategy.markets.is_empty() {
            return Err(ConfigError::MissingField { field: "markets" }.into());
        }
        let mut seen = HashSet::new();
        for market in &strategy.markets {
            let market = market.trim();
            if market.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "markets",
                    reason: "market names must not be empty".to_string(),
                }
                .into());
            }
            if !seen.insert(market) {
                return Err(ConfigError::InvalidValue {
                    field: "markets",
                    reason: format!("duplicate market {market}"),
                }
                .into());
            }
        }

        if strategy.min_funding_rate_diff < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "min_funding_rate_diff",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if strategy.position_size_usd <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "position_size_usd",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if strategy.max_position_usd <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "max_position_usd",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if strategy.position_size_usd > strategy.max_position_usd {
            return Err(ConfigError::InvalidValue {
                field: "position_size_usd",
                reason: "must not exceed max_position_usd".to_string(),
            }
            .into());
        }
        if strategy.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if strategy.call_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "call_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        for venue in [&self.venues.a, &self.venues.b] {
            if venue.name.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "name" }.into());
            }
            if let Some(url) = &venue.api_url {
                if let Err(e) = url::Url::parse(url) {
                    return Err(ConfigError::InvalidValue {
                        field: "api_url",
                        reason: format!("{url}: {e}"),
                    }
                    .into());
                }
            }
            if venue.balance < Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: "balance",
                    reason: "must be 0 or greater".to_string(),
                }
                .into());
            }
        }
        if self.venues.a.name.trim() == self.venues.b.name.trim() {
            return Err(ConfigError::InvalidValue {
                field: "venues",
                reason: "venue names must be distinct".to_string(),
            }
            .into());
        }

        for (market, price) in &self.prices {
            if *price <= Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: "prices",
                    reason: format!("price for {market} must be greater than 0"),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Configured markets without a reference price. Openings on these
    /// markets are refused at runtime.
    #[must_use]
    pub fn unpriced_markets(&self) -> Vec<MarketId> {
        self.strategy
            .market_ids()
            .into_iter()
            .filter(|m| !self.prices.contains_key(m.as_str()))
            .collect()
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
