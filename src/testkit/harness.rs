//! Engine wired over two scripted venues.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal_macros::dec;

use super::doubles::{FixedPriceSource, RecordingNotifier};
use super::venue::ScriptedVenue;
use crate::application::{
    ArbitrageEngine, EngineSettings, ExecutionCoordinator, ExecutionSettings, PositionLedger,
    RateSnapshotFetcher,
};
use crate::domain::{Direction, MarketId, PositionInfo, Price, Rate, Usd, VenueId};
use crate::port::{NotifierRegistry, VenuePair};

/// Knobs for [`Harness::new`].
#[derive(Debug, Clone)]
pub struct HarnessSettings {
    pub markets: Vec<&'static str>,
    pub threshold: Rate,
    pub position_size_usd: Usd,
    pub max_position_usd: Usd,
    pub call_timeout: Duration,
    pub dry_run: bool,
    /// Reference price for every market; `None` leaves all markets unpriced.
    pub price: Option<Price>,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            markets: vec!["BTC-USD"],
            threshold: dec!(0.0001),
            position_size_usd: dec!(20),
            max_position_usd: dec!(100),
            call_timeout: Duration::from_secs(5),
            dry_run: false,
            price: Some(dec!(50000)),
        }
    }
}

pub struct Harness {
    pub venue_a: Arc<ScriptedVenue>,
    pub venue_b: Arc<ScriptedVenue>,
    pub prices: Arc<FixedPriceSource>,
    pub notifier: RecordingNotifier,
    pub ledger: Arc<PositionLedger>,
    pub coordinator: Arc<ExecutionCoordinator>,
    pub engine: Arc<ArbitrageEngine>,
}

impl Harness {
    pub fn new(settings: HarnessSettings) -> Self {
        let venue_a = Arc::new(ScriptedVenue::new("venue-a"));
        let venue_b = Arc::new(ScriptedVenue::new("venue-b"));
        let venues = VenuePair::new(venue_a.clone(), venue_b.clone());

        let prices = Arc::new(match settings.price {
            Some(price) => FixedPriceSource::uniform(price),
            None => FixedPriceSource::new(),
        });

        let notifier = RecordingNotifier::new();
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(notifier.clone()));
        let notifiers = Arc::new(registry);

        let ledger = Arc::new(PositionLedger::new());
        let coordinator = Arc::new(ExecutionCoordinator::new(
            venues.clone(),
            Arc::clone(&ledger),
            prices.clone(),
            Arc::clone(&notifiers),
            ExecutionSettings {
                position_size_usd: settings.position_size_usd,
                max_position_usd: settings.max_position_usd,
                call_timeout: settings.call_timeout,
            },
        ));
        let engine = Arc::new(ArbitrageEngine::new(
            RateSnapshotFetcher::new(venues, settings.call_timeout),
            Arc::clone(&coordinator),
            notifiers,
            EngineSettings {
                markets: settings.markets.iter().map(|m| MarketId::from(*m)).collect(),
                min_funding_rate_diff: settings.threshold,
                dry_run: settings.dry_run,
            },
        ));

        Self {
            venue_a,
            venue_b,
            prices,
            notifier,
            ledger,
            coordinator,
            engine,
        }
    }

    /// Harness with default settings.
    pub fn standard() -> Self {
        Self::new(HarnessSettings::default())
    }

    /// Quote `market` on both venues.
    pub fn set_rates(&self, market: &str, rate_a: Rate, rate_b: Rate) {
        self.venue_a.set_rate(market, rate_a);
        self.venue_b.set_rate(market, rate_b);
    }
}

/// A committed position long on venue B, short on venue A.
pub fn position(market: &str, size_usd: Usd) -> PositionInfo {
    PositionInfo {
        market: MarketId::from(market),
        direction: Direction::LongBShortA,
        long_venue: VenueId::new("venue-b"),
        short_venue: VenueId::new("venue-a"),
        size_usd,
        created_at: Utc::now(),
    }
}
