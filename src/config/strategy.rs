//! Arbitrage strategy parameters.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::MarketId;

/// `[strategy]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    /// Markets evaluated each cycle, in this order.
    pub markets: Vec<String>,
    /// Differential that must be strictly exceeded to open a pair.
    pub min_funding_rate_diff: Decimal,
    /// Notional of each new pair in USD.
    pub position_size_usd: Decimal,
    /// Cap on aggregate open notional in USD.
    pub max_position_usd: Decimal,
    /// Seconds between cycles (default: 60).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Deadline for each venue call in seconds (default: 10).
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

const fn default_interval_secs() -> u64 {
    60
}

const fn default_call_timeout_secs() -> u64 {
    10
}

impl StrategyConfig {
    #[must_use]
    pub fn market_ids(&self) -> Vec<MarketId> {
        self.markets.iter().map(|m| MarketId::new(m.trim())).collect()
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}
