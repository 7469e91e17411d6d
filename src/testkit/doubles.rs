//! Price source and notifier doubles.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{MarketId, Price};
use crate::port::{Event, LegAction, Notifier, PriceSource};

/// Reference prices set by the test, with an optional fallback for any
/// market not listed.
#[derive(Debug, Default)]
pub struct FixedPriceSource {
    prices: Mutex<HashMap<MarketId, Price>>,
    fallback: Mutex<Option<Price>>,
}

impl FixedPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same price for every market.
    pub fn uniform(price: Price) -> Self {
        let source = Self::default();
        *source.fallback.lock() = Some(price);
        source
    }

    pub fn set(&self, market: &str, price: Price) {
        self.prices.lock().insert(MarketId::from(market), price);
    }

    /// Make `market` unpriced, fallback included.
    pub fn clear(&self, market: &str) {
        self.prices.lock().remove(&MarketId::from(market));
        *self.fallback.lock() = None;
    }
}

impl PriceSource for FixedPriceSource {
    fn reference_price(&self, market: &MarketId) -> Option<Price> {
        self.prices
            .lock()
            .get(market)
            .copied()
            .or(*self.fallback.lock())
    }
}

/// Notifier that keeps every event for later assertions. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Leg actions in the order they were reported, with success flags.
    pub fn legs(&self) -> Vec<(LegAction, bool)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::LegExecuted(leg) => Some((leg.action, leg.is_success())),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().push(event);
    }
}
