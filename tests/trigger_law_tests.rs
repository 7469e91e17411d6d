//! Direction, open and close trigger laws evaluated through full cycles.

use fundarb::domain::{Direction, MarketId};
use fundarb::testkit::{position, Harness, HarnessSettings};
use rust_decimal_macros::dec;

fn btc() -> MarketId {
    MarketId::from("BTC-USD")
}

#[tokio::test]
async fn negative_diff_goes_long_on_a_short_on_b() {
    let h = Harness::standard();
    h.set_rates("BTC-USD", dec!(0.0001), dec!(0.0005));

    h.engine.run_cycle().await.unwrap();

    let position = h.ledger.get(&btc()).unwrap();
    assert_eq!(position.direction, Direction::LongAShortB);
    assert_eq!(position.long_venue.as_str(), "venue-a");
    assert_eq!(position.short_venue.as_str(), "venue-b");
}

#[tokio::test]
async fn diff_equal_to_threshold_does_not_open() {
    let h = Harness::standard();
    h.set_rates("BTC-USD", dec!(0.0002), dec!(0.0001));

    let report = h.engine.run_cycle().await.unwrap();

    assert_eq!(report.opened, 0);
    assert!(h.ledger.is_empty());
    assert!(h.venue_a.order_calls().is_empty());
}

#[tokio::test]
async fn diff_just_above_threshold_opens() {
    let h = Harness::standard();
    h.set_rates("BTC-USD", dec!(0.00020001), dec!(0.0001));

    let report = h.engine.run_cycle().await.unwrap();
    assert_eq!(report.opened, 1);
}

#[tokio::test]
async fn flattened_spread_closes() {
    let h = Harness::standard();
    h.set_rates("BTC-USD", dec!(0.0005), dec!(0.0001));
    h.engine.run_cycle().await.unwrap();

    h.set_rates("BTC-USD", dec!(0.0002), dec!(0.0002));
    let report = h.engine.run_cycle().await.unwrap();

    assert_eq!(report.closed, 1);
    assert!(h.ledger.is_empty());
}

#[tokio::test]
async fn sub_threshold_favourable_spread_holds() {
    let h = Harness::standard();
    h.set_rates("BTC-USD", dec!(0.0005), dec!(0.0001));
    h.engine.run_cycle().await.unwrap();

    h.set_rates("BTC-USD", dec!(0.00015), dec!(0.0001));
    let report = h.engine.run_cycle().await.unwrap();

    assert_eq!(report.closed, 0);
    assert!(h.ledger.get(&btc()).is_some());
}

#[tokio::test]
async fn close_is_symmetric_for_short_leg_on_b() {
    let h = Harness::standard();
    h.set_rates("BTC-USD", dec!(0.0001), dec!(0.0005));
    h.engine.run_cycle().await.unwrap();

    // Still favourable for the short on B.
    h.set_rates("BTC-USD", dec!(0.0001), dec!(0.00011));
    assert_eq!(h.engine.run_cycle().await.unwrap().closed, 0);

    // Venue A now pays more: unfavourable for the short on B.
    h.set_rates("BTC-USD", dec!(0.0002), dec!(0.0001));
    assert_eq!(h.engine.run_cycle().await.unwrap().closed, 1);
    assert!(h.ledger.is_empty());
}

#[tokio::test]
async fn markets_missing_from_a_snapshot_are_untouched() {
    let h = Harness::new(HarnessSettings {
        markets: vec!["BTC-USD", "ETH-USD", "SOL-USD"],
        ..HarnessSettings::default()
    });
    // ETH only quoted on A; SOL has a position but is missing on B.
    h.set_rates("BTC-USD", dec!(0.0005), dec!(0.0001));
    h.venue_a.set_rate("ETH-USD", dec!(0.0009));
    h.venue_a.set_rate("SOL-USD", dec!(-0.001));
    assert!(h
        .ledger
        .try_insert(MarketId::from("SOL-USD"), position("SOL-USD", dec!(20))));

    let report = h.engine.run_cycle().await.unwrap();

    assert_eq!(report.skipped, 2);
    assert_eq!(report.opened, 1);
    assert_eq!(report.closed, 0);
    assert!(h.ledger.get(&MarketId::from("ETH-USD")).is_none());
    assert!(h.ledger.get(&MarketId::from("SOL-USD")).is_some());
    assert_eq!(h.venue_a.order_calls().len(), 1);
    assert_eq!(h.venue_b.order_calls().len(), 1);
}

#[tokio::test]
async fn markets_are_evaluated_in_configured_order() {
    let h = Harness::new(HarnessSettings {
        markets: vec!["ETH-USD", "BTC-USD"],
        max_position_usd: dec!(20),
        ..HarnessSettings::default()
    });
    h.set_rates("BTC-USD", dec!(0.0005), dec!(0.0001));
    h.set_rates("ETH-USD", dec!(0.0005), dec!(0.0001));

    let report = h.engine.run_cycle().await.unwrap();

    // Room for one pair only: the first configured market wins.
    assert_eq!(report.opened, 1);
    assert_eq!(report.rejected, 1);
    assert!(h.ledger.get(&MarketId::from("ETH-USD")).is_some());
    assert!(h.ledger.get(&btc()).is_none());
}
