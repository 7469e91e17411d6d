//! End-to-end cycles through the engine over scripted venues.

use fundarb::application::CloseOutcome;
use fundarb::domain::{Direction, MarketId, Side};
use fundarb::port::{Event, LegAction};
use fundarb::testkit::{api_error, position, Harness, HarnessSettings, VenueCall};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn btc() -> MarketId {
    MarketId::from("BTC-USD")
}

#[tokio::test]
async fn scenario_a_opens_long_on_lower_rate_short_on_higher() {
    let h = Harness::standard();
    h.set_rates("BTC-USD", dec!(0.0005), dec!(0.0001));

    let report = h.engine.run_cycle().await.unwrap();

    assert_eq!(report.opened, 1);
    let position = h.ledger.get(&btc()).unwrap();
    assert_eq!(position.direction, Direction::LongBShortA);
    assert_eq!(position.long_venue.as_str(), "venue-b");
    assert_eq!(position.short_venue.as_str(), "venue-a");
    assert_eq!(position.size_usd, dec!(20));

    // 20 USD at a reference price of 50000.
    assert_eq!(
        h.venue_b.order_calls(),
        vec![VenueCall::PlaceOrder {
            market: btc(),
            side: Side::Long,
            amount: dec!(0.0004),
        }]
    );
    assert_eq!(
        h.venue_a.order_calls(),
        vec![VenueCall::PlaceOrder {
            market: btc(),
            side: Side::Short,
            amount: dec!(0.0004),
        }]
    );
    assert_eq!(
        h.notifier.legs(),
        vec![(LegAction::OpenLong, true), (LegAction::OpenShort, true)]
    );
}

#[tokio::test]
async fn scenario_b_close_removes_entry_before_any_venue_call() {
    let h = Harness::standard();
    h.set_rates("BTC-USD", dec!(0.0005), dec!(0.0001));
    h.engine.run_cycle().await.unwrap();
    assert!(h.ledger.get(&btc()).is_some());

    h.set_rates("BTC-USD", dec!(0.0001), dec!(0.0003));
    let gate = h.venue_b.gate();
    let engine = h.engine.clone();
    let cycle = tokio::spawn(async move { engine.run_cycle().await });

    // The long leg close is parked at the gate: no venue call has completed.
    gate.wait_entered().await;
    assert!(h.ledger.get(&btc()).is_none());
    assert!(h.ledger.is_empty());
    assert_eq!(h.ledger.total_exposure(), Decimal::ZERO);

    gate.open_once();
    let report = cycle.await.unwrap().unwrap();
    assert_eq!(report.closed, 1);
    assert_eq!(report.failed, 0);

    assert_eq!(
        h.venue_b.order_calls().last(),
        Some(&VenueCall::ClosePosition {
            market: btc(),
            side: Side::Long,
            amount: dec!(0.0004),
        })
    );
    assert_eq!(
        h.venue_a.order_calls().last(),
        Some(&VenueCall::ClosePosition {
            market: btc(),
            side: Side::Short,
            amount: dec!(0.0004),
        })
    );
}

#[tokio::test]
async fn scenario_c_unchanged_market_with_open_position_places_nothing() {
    let h = Harness::standard();
    h.set_rates("BTC-USD", dec!(0.0005), dec!(0.0001));
    h.engine.run_cycle().await.unwrap();
    let calls_after_open = h.venue_a.order_calls().len() + h.venue_b.order_calls().len();

    let report = h.engine.run_cycle().await.unwrap();

    assert_eq!(report.opened, 0);
    assert_eq!(report.closed, 0);
    assert_eq!(
        h.venue_a.order_calls().len() + h.venue_b.order_calls().len(),
        calls_after_open
    );
    assert_eq!(h.ledger.len(), 1);
}

#[tokio::test]
async fn scenario_d_exposure_cap_rejects_without_orders() {
    let h = Harness::standard();
    assert!(h
        .ledger
        .try_insert(MarketId::from("ETH-USD"), position("ETH-USD", dec!(90))));
    h.set_rates("BTC-USD", dec!(0.0005), dec!(0.0001));

    let report = h.engine.run_cycle().await.unwrap();

    assert_eq!(report.rejected, 1);
    assert_eq!(report.opened, 0);
    assert!(h.venue_a.order_calls().is_empty());
    assert!(h.venue_b.order_calls().is_empty());
    assert_eq!(h.ledger.total_exposure(), dec!(90));
    assert!(h.ledger.get(&btc()).is_none());
    assert_eq!(
        h.notifier.count(|e| matches!(e, Event::OpenRejected(r) if r.market == "BTC-USD")),
        1
    );
}

#[tokio::test]
async fn scenario_e_long_leg_failure_skips_short_leg() {
    let h = Harness::standard();
    h.set_rates("BTC-USD", dec!(0.0005), dec!(0.0001));
    h.venue_b
        .fail_orders(Side::Long, api_error("venue-b", "insufficient margin"));

    let report = h.engine.run_cycle().await.unwrap();

    assert_eq!(report.failed, 1);
    assert!(h.venue_a.order_calls().is_empty());
    assert!(h.ledger.get(&btc()).is_none());
    assert!(!h.ledger.is_pending(&btc()));
    assert_eq!(h.ledger.total_exposure(), Decimal::ZERO);
    assert_eq!(h.notifier.legs(), vec![(LegAction::OpenLong, false)]);

    // The reservation was released, so the next cycle can open.
    h.venue_b.clear_failures();
    let report = h.engine.run_cycle().await.unwrap();
    assert_eq!(report.opened, 1);
}

#[tokio::test]
async fn dry_run_logs_openings_without_orders() {
    let h = Harness::new(HarnessSettings {
        dry_run: true,
        ..HarnessSettings::default()
    });
    h.set_rates("BTC-USD", dec!(0.0005), dec!(0.0001));

    let report = h.engine.run_cycle().await.unwrap();

    assert_eq!(report.dry_run, 1);
    assert_eq!(report.opened, 0);
    assert!(h.venue_a.order_calls().is_empty());
    assert!(h.venue_b.order_calls().is_empty());
    assert!(h.ledger.is_empty());
}

#[tokio::test]
async fn concurrent_close_of_same_market_closes_once() {
    let h = Harness::standard();
    h.set_rates("BTC-USD", dec!(0.0005), dec!(0.0001));
    h.engine.run_cycle().await.unwrap();

    let gate = h.venue_b.gate();
    let coordinator = h.coordinator.clone();
    let first = tokio::spawn(async move { coordinator.close(&MarketId::from("BTC-USD")).await });
    gate.wait_entered().await;

    let second = h.coordinator.close(&btc()).await;
    assert!(matches!(second, CloseOutcome::NotOpen));

    gate.open_once();
    assert!(matches!(first.await.unwrap(), CloseOutcome::Closed(_)));
    assert_eq!(
        h.notifier
            .count(|e| matches!(e, Event::LegExecuted(l) if l.action == LegAction::CloseLong)),
        1
    );
}
