//! Authoritative in-memory record of open arbitrage positions.
//!
//! Every read and write goes through one `parking_lot::Mutex`, held only for
//! the duration of a map operation and never across an `.await`. Openings
//! claim the market first with a pending [`Reservation`], place their legs
//! unlocked, then commit or drop the reservation.

use std::collections::HashMap;

use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{MarketId, PositionInfo, Usd};
use crate::error::RiskError;

#[derive(Debug, Clone)]
enum Slot {
    /// Opening in flight, reserving this notional.
    Pending(Usd),
    Open(PositionInfo),
}

impl Slot {
    fn size_usd(&self) -> Usd {
        match self {
            Self::Pending(size) => *size,
            Self::Open(info) => info.size_usd,
        }
    }
}

/// One position per market, shared between the engine and the coordinator.
#[derive(Debug, Default)]
pub struct PositionLedger {
    slots: Mutex<HashMap<MarketId, Slot>>,
}

impl PositionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a committed position. Returns `false` if the market is already
    /// held or reserved.
    pub fn try_insert(&self, market: MarketId, info: PositionInfo) -> bool {
        let mut slots = self.slots.lock();
        if slots.contains_key(&market) {
            return false;
        }
        slots.insert(market, Slot::Open(info));
        true
    }

    /// Remove and return the committed position for a market.
    ///
    /// Returns `None` when nothing is open. A pending reservation is left in
    /// place.
    pub fn remove_if_present(&self, market: &MarketId) -> Option<PositionInfo> {
        let mut slots = self.slots.lock();
        match slots.get(market) {
            Some(Slot::Open(_)) => match slots.remove(market) {
                Some(Slot::Open(info)) => Some(info),
                _ => None,
            },
            _ => None,
        }
    }

    /// Committed position for a market, if any.
    #[must_use]
    pub fn get(&self, market: &MarketId) -> Option<PositionInfo> {
        match self.slots.lock().get(market) {
            Some(Slot::Open(info)) => Some(info.clone()),
            _ => None,
        }
    }

    /// Sum of committed and reserved notionals.
    #[must_use]
    pub fn total_exposure(&self) -> Usd {
        self.slots.lock().values().map(Slot::size_usd).sum()
    }

    /// True while an opening for `market` is in flight.
    #[must_use]
    pub fn is_pending(&self, market: &MarketId) -> bool {
        matches!(self.slots.lock().get(market), Some(Slot::Pending(_)))
    }

    /// Atomically claim `market` for an opening of `size_usd`.
    ///
    /// Fails if the market is already open or reserved, or if the new notional
    /// would take total exposure above `max_exposure`.
    pub fn try_reserve(
        &self,
        market: &MarketId,
        size_usd: Usd,
        max_exposure: Usd,
    ) -> Result<Reservation<'_>, RiskError> {
        let mut slots = self.slots.lock();

        match slots.get(market) {
            Some(Slot::Open(_)) => {
                return Err(RiskError::AlreadyOpen {
                    market: market.to_string(),
                })
            }
            Some(Slot::Pending(_)) => {
                return Err(RiskError::PendingOpen {
                    market: market.to_string(),
                })
            }
            None => {}
        }

        let current: Decimal = slots.values().map(Slot::size_usd).sum();
        let within_cap = current
            .checked_add(size_usd)
            .is_some_and(|total| total <= max_exposure);
        if !within_cap {
            return Err(RiskError::ExposureLimitExceeded {
                current,
                additional: size_usd,
                limit: max_exposure,
            });
        }

        slots.insert(market.clone(), Slot::Pending(size_usd));
        Ok(Reservation {
            ledger: self,
            market: market.clone(),
            active: true,
        })
    }

    /// Snapshot of committed positions, ordered by market.
    #[must_use]
    pub fn positions(&self) -> Vec<PositionInfo> {
        let mut positions: Vec<PositionInfo> = self
            .slots
            .lock()
            .values()
            .filter_map(|slot| match slot {
                Slot::Open(info) => Some(info.clone()),
                Slot::Pending(_) => None,
            })
            .collect();
        positions.sort_by(|a, b| a.market.cmp(&b.market));
        positions
    }

    /// Number of committed positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Open(_)))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, market: &MarketId) {
        let mut slots = self.slots.lock();
        if matches!(slots.get(market), Some(Slot::Pending(_))) {
            slots.remove(market);
        }
    }

    fn commit(&self, market: &MarketId, info: PositionInfo) {
        self.slots.lock().insert(market.clone(), Slot::Open(info));
    }
}

/// Pending claim on a market. Released on drop unless committed.
#[derive(Debug)]
#[must_use = "dropping a reservation releases it"]
pub struct Reservation<'a> {
    ledger: &'a PositionLedger,
    market: MarketId,
    active: bool,
}

impl Reservation<'_> {
    /// Turn the reservation into a committed position.
    pub fn commit(mut self, info: PositionInfo) {
        self.active = false;
        self.ledger.commit(&self.market, info);
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.active {
            self.ledger.release(&self.market);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, VenueId};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn position(market: &str, size: Decimal) -> PositionInfo {
        PositionInfo {
            market: MarketId::from(market),
            direction: Direction::LongBShortA,
            long_venue: VenueId::from("venue-b"),
            short_venue: VenueId::from("venue-a"),
            size_usd: size,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_try_insert_rejects_duplicate() {
        let ledger = PositionLedger::new();
        let btc = MarketId::from("BTC-USD");

        assert!(ledger.try_insert(btc.clone(), position("BTC-USD", dec!(20))));
        assert!(!ledger.try_insert(btc.clone(), position("BTC-USD", dec!(30))));
        assert_eq!(ledger.get(&btc).unwrap().size_usd, dec!(20));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let ledger = PositionLedger::new();
        let btc = MarketId::from("BTC-USD");
        ledger.try_insert(btc.clone(), position("BTC-USD", dec!(20)));

        assert!(ledger.remove_if_present(&btc).is_some());
        assert!(ledger.remove_if_present(&btc).is_none());
        assert!(ledger.get(&btc).is_none());
        assert_eq!(ledger.total_exposure(), Decimal::ZERO);
    }

    #[test]
    fn test_total_exposure_sums_positions() {
        let ledger = PositionLedger::new();
        ledger.try_insert("BTC-USD".into(), position("BTC-USD", dec!(50)));
        ledger.try_insert("ETH-USD".into(), position("ETH-USD", dec!(40)));

        assert_eq!(ledger.total_exposure(), dec!(90));
    }

    #[test]
    fn test_reservation_blocks_second_open() {
        let ledger = PositionLedger::new();
        let btc = MarketId::from("BTC-USD");

        let reservation = ledger.try_reserve(&btc, dec!(20), dec!(100)).unwrap();
        assert!(ledger.is_pending(&btc));
        assert!(ledger.get(&btc).is_none());

        let err = ledger.try_reserve(&btc, dec!(20), dec!(100)).unwrap_err();
        assert_eq!(
            err,
            RiskError::PendingOpen {
                market: "BTC-USD".into()
            }
        );
        drop(reservation);
    }

    #[test]
    fn test_reservation_counts_toward_exposure() {
        let ledger = PositionLedger::new();
        let _btc = ledger
            .try_reserve(&MarketId::from("BTC-USD"), dec!(60), dec!(100))
            .unwrap();

        assert_eq!(ledger.total_exposure(), dec!(60));
        let err = ledger
            .try_reserve(&MarketId::from("ETH-USD"), dec!(60), dec!(100))
            .unwrap_err();
        assert!(matches!(err, RiskError::ExposureLimitExceeded { .. }));
    }

    #[test]
    fn test_exposure_cap_is_inclusive() {
        let ledger = PositionLedger::new();
        ledger.try_insert("BTC-USD".into(), position("BTC-USD", dec!(80)));

        assert!(ledger
            .try_reserve(&MarketId::from("ETH-USD"), dec!(20), dec!(100))
            .is_ok());
    }

    #[test]
    fn test_exposure_overflow_is_rejected() {
        let ledger = PositionLedger::new();
        ledger.try_insert("BTC-USD".into(), position("BTC-USD", Decimal::MAX));

        let err = ledger
            .try_reserve(&MarketId::from("ETH-USD"), Decimal::MAX, Decimal::MAX)
            .unwrap_err();
        assert!(matches!(err, RiskError::ExposureLimitExceeded { .. }));
        assert!(!ledger.is_pending(&MarketId::from("ETH-USD")));
    }

    #[test]
    fn test_dropped_reservation_is_released() {
        let ledger = PositionLedger::new();
        let btc = MarketId::from("BTC-USD");

        {
            let _reservation = ledger.try_reserve(&btc, dec!(20), dec!(100)).unwrap();
            assert_eq!(ledger.total_exposure(), dec!(20));
        }

        assert!(!ledger.is_pending(&btc));
        assert_eq!(ledger.total_exposure(), Decimal::ZERO);
        assert!(ledger.try_reserve(&btc, dec!(20), dec!(100)).is_ok());
    }

    #[test]
    fn test_commit_records_position() {
        let ledger = PositionLedger::new();
        let btc = MarketId::from("BTC-USD");

        let reservation = ledger.try_reserve(&btc, dec!(20), dec!(100)).unwrap();
        reservation.commit(position("BTC-USD", dec!(20)));

        assert!(!ledger.is_pending(&btc));
        assert_eq!(ledger.get(&btc).unwrap().size_usd, dec!(20));
        assert_eq!(ledger.positions().len(), 1);
        assert_eq!(ledger.total_exposure(), dec!(20));
    }

    #[test]
    fn test_remove_leaves_pending_reservation() {
        let ledger = PositionLedger::new();
        let btc = MarketId::from("BTC-USD");

        let _reservation = ledger.try_reserve(&btc, dec!(20), dec!(100)).unwrap();
        assert!(ledger.remove_if_present(&btc).is_none());
        assert!(ledger.is_pending(&btc));
    }

    #[test]
    fn test_already_open_rejected() {
        let ledger = PositionLedger::new();
        let btc = MarketId::from("BTC-USD");
        ledger.try_insert(btc.clone(), position("BTC-USD", dec!(20)));

        let err = ledger.try_reserve(&btc, dec!(20), dec!(100)).unwrap_err();
        assert_eq!(
            err,
            RiskError::AlreadyOpen {
                market: "BTC-USD".into()
            }
        );
    }
}
