//! At-most-one position per market and the exposure cap under concurrent
//! opening attempts.

use std::time::Duration;

use fundarb::application::OpenOutcome;
use fundarb::domain::{Direction, MarketId};
use fundarb::error::RiskError;
use fundarb::testkit::{Harness, HarnessSettings};
use rust_decimal_macros::dec;

#[tokio::test]
async fn second_open_for_same_market_blocked_while_first_in_flight() {
    let h = Harness::standard();
    let gate = h.venue_b.gate();

    let coordinator = h.coordinator.clone();
    let first = tokio::spawn(async move {
        coordinator
            .open(&MarketId::from("BTC-USD"), Direction::LongBShortA, dec!(0.0004))
            .await
    });
    gate.wait_entered().await;

    let market = MarketId::from("BTC-USD");
    assert!(h.ledger.is_pending(&market));
    assert!(h.ledger.get(&market).is_none());
    assert_eq!(h.ledger.total_exposure(), dec!(20));

    let second = h
        .coordinator
        .open(&market, Direction::LongBShortA, dec!(0.0004))
        .await;
    assert!(matches!(
        second,
        OpenOutcome::Rejected(RiskError::PendingOpen { .. })
    ));

    gate.open_once();
    assert!(first.await.unwrap().is_opened());

    let third = h
        .coordinator
        .open(&market, Direction::LongAShortB, dec!(0.0004))
        .await;
    assert!(matches!(
        third,
        OpenOutcome::Rejected(RiskError::AlreadyOpen { .. })
    ));
    assert_eq!(h.ledger.len(), 1);
    assert_eq!(h.venue_b.order_calls().len(), 1);
}

#[tokio::test]
async fn openings_on_different_markets_are_not_serialized() {
    let h = Harness::standard();
    let gate = h.venue_b.gate();

    let mut handles = Vec::new();
    for market in ["BTC-USD", "ETH-USD"] {
        let coordinator = h.coordinator.clone();
        handles.push(tokio::spawn(async move {
            coordinator
                .open(&MarketId::from(market), Direction::LongBShortA, dec!(0.0004))
                .await
        }));
    }

    // Both long legs are in flight at once.
    gate.wait_entered().await;
    gate.wait_entered().await;
    assert_eq!(h.ledger.total_exposure(), dec!(40));

    gate.open_once();
    gate.open_once();
    for handle in handles {
        assert!(handle.await.unwrap().is_opened());
    }
    assert_eq!(h.ledger.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_openings_never_exceed_exposure_cap() {
    let h = Harness::new(HarnessSettings {
        position_size_usd: dec!(20),
        max_position_usd: dec!(100),
        ..HarnessSettings::default()
    });
    h.venue_a.set_delay(Duration::from_millis(5));
    h.venue_b.set_delay(Duration::from_millis(5));

    let mut handles = Vec::new();
    for i in 0..10 {
        let coordinator = h.coordinator.clone();
        handles.push(tokio::spawn(async move {
            coordinator
                .open(
                    &MarketId::from(format!("M{i}-USD")),
                    Direction::LongAShortB,
                    dec!(0.001),
                )
                .await
        }));
    }

    let mut opened = 0;
    let mut capped = 0;
    for handle in handles {
        match handle.await.unwrap() {
            OpenOutcome::Opened(_) => opened += 1,
            OpenOutcome::Rejected(RiskError::ExposureLimitExceeded { .. }) => capped += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(opened, 5);
    assert_eq!(capped, 5);
    assert_eq!(h.ledger.total_exposure(), dec!(100));
    assert_eq!(h.ledger.len(), 5);
}

#[tokio::test]
async fn failed_opening_frees_its_reservation() {
    let h = Harness::new(HarnessSettings {
        max_position_usd: dec!(20),
        price: None,
        ..HarnessSettings::default()
    });
    let market = MarketId::from("BTC-USD");

    let outcome = h
        .coordinator
        .open(&market, Direction::LongBShortA, dec!(0.0004))
        .await;
    assert!(matches!(
        outcome,
        OpenOutcome::Rejected(RiskError::PriceUnavailable { .. })
    ));
    assert!(!h.ledger.is_pending(&market));
    assert_eq!(h.ledger.total_exposure(), dec!(0));

    h.prices.set("BTC-USD", dec!(40000));
    let outcome = h
        .coordinator
        .open(&market, Direction::LongBShortA, dec!(0.0004))
        .await;
    assert!(outcome.is_opened());
}
