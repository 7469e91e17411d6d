//! Reference prices from configuration.

use std::collections::HashMap;

use crate::domain::{MarketId, Price};
use crate::port::PriceSource;

/// Fixed per-market prices, typically the `[prices]` table.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    prices: HashMap<MarketId, Price>,
}

impl StaticPriceSource {
    pub fn new<I, M>(prices: I) -> Self
    where
        I: IntoIterator<Item = (M, Price)>,
        M: Into<MarketId>,
    {
        Self {
            prices: prices.into_iter().map(|(m, p)| (m.into(), p)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PriceSource for StaticPriceSource {
    fn reference_price(&self, market: &MarketId) -> Option<Price> {
        self.prices.get(market).copied()
    }
}
