//! Funding-rate quotes and per-cycle snapshots.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MarketId, Rate};

/// A venue's current funding rate for one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRate {
    pub market: MarketId,
    pub rate: Rate,
    pub next_funding_time: Option<DateTime<Utc>>,
}

impl FundingRate {
    pub fn new(market: impl Into<MarketId>, rate: Rate) -> Self {
        Self {
            market: market.into(),
            rate,
            next_funding_time: None,
        }
    }
}

/// Both venues' rates for one market.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePair {
    pub rate_a: Rate,
    pub rate_b: Rate,
}

impl RatePair {
    /// Differential `rate_a - rate_b`.
    #[must_use]
    pub fn diff(&self) -> Rate {
        self.rate_a - self.rate_b
    }
}

/// Market -> rate lookups for both venues, built fresh every cycle.
#[derive(Debug, Clone, Default)]
pub struct RateSnapshot {
    venue_a: HashMap<MarketId, Rate>,
    venue_b: HashMap<MarketId, Rate>,
}

impl RateSnapshot {
    /// Build lookups from the raw venue responses.
    ///
    /// A market repeated in one feed keeps its last quote.
    #[must_use]
    pub fn from_rates(rates_a: Vec<FundingRate>, rates_b: Vec<FundingRate>) -> Self {
        fn index(rates: Vec<FundingRate>) -> HashMap<MarketId, Rate> {
            rates.into_iter().map(|r| (r.market, r.rate)).collect()
        }

        Self {
            venue_a: index(rates_a),
            venue_b: index(rates_b),
        }
    }

    /// Rates for a market, or `None` when either venue does not quote it.
    #[must_use]
    pub fn pair(&self, market: &MarketId) -> Option<RatePair> {
        let rate_a = *self.venue_a.get(market)?;
        let rate_b = *self.venue_b.get(market)?;
        Some(RatePair { rate_a, rate_b })
    }

    #[must_use]
    pub fn rate_a(&self, market: &MarketId) -> Option<Rate> {
        self.venue_a.get(market).copied()
    }

    #[must_use]
    pub fn rate_b(&self, market: &MarketId) -> Option<Rate> {
        self.venue_b.get(market).copied()
    }
}
