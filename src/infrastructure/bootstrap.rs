//! Construction of the engine and its collaborators from configuration.

use std::sync::Arc;

#[cfg(feature = "telegram")]
use tracing::{info, warn};

use crate::adapter::price::StaticPriceSource;
use crate::adapter::venue::build_venue;
use crate::application::{
    ArbitrageEngine, EngineSettings, ExecutionCoordinator, ExecutionSettings, PositionLedger,
    RateSnapshotFetcher,
};
use crate::config::Config;
use crate::port::{LogNotifier, NotifierRegistry, PriceSource, VenuePair};

#[cfg(feature = "telegram")]
use crate::adapter::notifier::{TelegramConfig, TelegramNotifier};

/// Build notifier registry from configuration.
#[cfg(feature = "telegram")]
pub fn build_notifier_registry(config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    if config.telegram.enabled {
        if let Some(tg_config) = TelegramConfig::from_env() {
            let tg_config = TelegramConfig {
                notify_successes: config.telegram.notify_successes,
                ..tg_config
            };
            registry.register(Box::new(TelegramNotifier::new(tg_config)));
            info!("Telegram notifier enabled");
        } else {
            warn!("Telegram enabled but TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set");
        }
    }

    registry
}

/// Build notifier registry from configuration (non-telegram variant).
#[cfg(not(feature = "telegram"))]
pub fn build_notifier_registry(_config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    registry
}

/// Build both venues with the configured network selection.
#[must_use]
pub fn build_venues(config: &Config) -> VenuePair {
    VenuePair::new(
        build_venue(&config.venues.a, config.testnet),
        build_venue(&config.venues.b, config.testnet),
    )
}

/// Reference prices from the `[prices]` table.
#[must_use]
pub fn build_price_source(config: &Config) -> StaticPriceSource {
    StaticPriceSource::new(
        config
            .prices
            .iter()
            .map(|(market, price)| (market.as_str(), *price)),
    )
}

/// Assemble the engine over already-built collaborators.
#[must_use]
pub fn build_engine(
    config: &Config,
    venues: VenuePair,
    prices: Arc<dyn PriceSource>,
    notifiers: Arc<NotifierRegistry>,
) -> ArbitrageEngine {
    let strategy = &config.strategy;
    let fetcher = RateSnapshotFetcher::new(venues.clone(), strategy.call_timeout());
    let coordinator = ExecutionCoordinator::new(
        venues,
        Arc::new(PositionLedger::new()),
        prices,
        Arc::clone(&notifiers),
        ExecutionSettings {
            position_size_usd: strategy.position_size_usd,
            max_position_usd: strategy.max_position_usd,
            call_timeout: strategy.call_timeout(),
        },
    );

    ArbitrageEngine::new(
        fetcher,
        Arc::new(coordinator),
        notifiers,
        EngineSettings {
            markets: strategy.market_ids(),
            min_funding_rate_diff: strategy.min_funding_rate_diff,
            dry_run: config.dry_run,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MarketId;
    use crate::testkit::config::paper;
    use rust_decimal_macros::dec;

    #[test]
    fn test_registry_has_log_notifier_when_telegram_disabled() {
        let registry = build_notifier_registry(&paper());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_price_source_from_prices_table() {
        let prices = build_price_source(&paper());
        assert_eq!(
            prices.reference_price(&MarketId::from("ETH-USD")),
            Some(dec!(2500))
        );
        assert_eq!(prices.reference_price(&MarketId::from("SOL-USD")), None);
    }

    #[test]
    fn test_venues_keep_slot_order() {
        let venues = build_venues(&paper());
        assert_eq!(venues.a().name(), "paper-a");
        assert_eq!(venues.b().name(), "paper-b");
    }

    #[test]
    fn test_engine_settings_follow_strategy() {
        let config = paper();
        let notifiers = Arc::new(build_notifier_registry(&config));
        let engine = build_engine(
            &config,
            build_venues(&config),
            Arc::new(build_price_source(&config)),
            notifiers,
        );

        assert!(engine.settings().dry_run);
        assert_eq!(engine.settings().markets.len(), 2);
        assert_eq!(engine.settings().min_funding_rate_diff, dec!(0.0001));
        assert_eq!(engine.coordinator().settings().position_size_usd, dec!(20));
    }
}
