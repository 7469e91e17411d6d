//! Reference price port.

use crate::domain::{MarketId, Price};

/// Synchronous reference-price lookup used to convert USD notionals into
/// base-asset amounts.
///
/// The engine makes no assumption about where prices come from.
pub trait PriceSource: Send + Sync {
    /// Current reference price for a market, or `None` when unavailable.
    fn reference_price(&self, market: &MarketId) -> Option<Price>;
}
