//! Two-leg opening and closing sequences.
//!
//! Openings reserve the market in the ledger, place the long leg, then the
//! short leg, and only commit a position once both are acknowledged. A failed
//! short leg leaves the long leg live on its venue; it is surfaced with
//! critical severity and never unwound automatically.
//!
//! Closings remove the ledger entry before any venue call and then close each
//! leg independently.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use super::call::bounded;
use super::ledger::PositionLedger;
use crate::domain::{
    Direction, MarketId, Order, OrderType, PositionInfo, Price, Rate, Side, Usd, VenueId,
};
use crate::error::{ExecutionError, RiskError, VenueError};
use crate::port::{
    Event, LegAction, LegEvent, NotifierRegistry, PriceSource, RejectionEvent, UnhedgedEvent,
    Venue, VenuePair,
};

/// Sizing and timing parameters for the coordinator.
#[derive(Debug, Clone)]
pub struct ExecutionSettings {
    /// Notional of every new pair.
    pub position_size_usd: Usd,
    /// Cap on aggregate open notional.
    pub max_position_usd: Usd,
    /// Deadline for each venue call.
    pub call_timeout: Duration,
}

/// Result of an opening sequence.
#[derive(Debug, Clone)]
pub enum OpenOutcome {
    Opened(PositionInfo),
    /// Refused before any order was placed.
    Rejected(RiskError),
    /// A leg failed after the checks passed.
    Failed(ExecutionError),
}

impl OpenOutcome {
    #[must_use]
    pub const fn is_opened(&self) -> bool {
        matches!(self, Self::Opened(_))
    }
}

/// Result of a closing sequence.
#[derive(Debug, Clone)]
pub enum CloseOutcome {
    Closed(PositionInfo),
    /// Entry removed, but at least one leg failed to close.
    Partial {
        position: PositionInfo,
        error: ExecutionError,
    },
    /// Nothing to close (already removed by a concurrent close).
    NotOpen,
    /// No reference price; the position stays recorded for the next cycle.
    Deferred(RiskError),
}

/// Carries out opening and closing sequences against the venue pair.
pub struct ExecutionCoordinator {
    venues: VenuePair,
    ledger: Arc<PositionLedger>,
    prices: Arc<dyn PriceSource>,
    notifiers: Arc<NotifierRegistry>,
    settings: ExecutionSettings,
}

impl ExecutionCoordinator {
    pub fn new(
        venues: VenuePair,
        ledger: Arc<PositionLedger>,
        prices: Arc<dyn PriceSource>,
        notifiers: Arc<NotifierRegistry>,
        settings: ExecutionSettings,
    ) -> Self {
        Self {
            venues,
            ledger,
            prices,
            notifiers,
            settings,
        }
    }

    #[must_use]
    pub fn ledger(&self) -> &Arc<PositionLedger> {
        &self.ledger
    }

    #[must_use]
    pub fn settings(&self) -> &ExecutionSettings {
        &self.settings
    }

    /// Open a pair on `market` in `direction`.
    pub async fn open(
        &self,
        market: &MarketId,
        direction: Direction,
        magnitude: Rate,
    ) -> OpenOutcome {
        let size_usd = self.settings.position_size_usd;

        let max_exposure = self.settings.max_position_usd;
        let reservation = match self.ledger.try_reserve(market, size_usd, max_exposure) {
            Ok(reservation) => reservation,
            Err(err) => return self.reject(market, err),
        };

        let Some(price) = self.reference_price(market) else {
            drop(reservation);
            return self.reject(
                market,
                RiskError::PriceUnavailable {
                    market: market.to_string(),
                },
            );
        };
        let amount = match order_amount(market, size_usd, price) {
            Ok(amount) => amount,
            Err(err) => {
                drop(reservation);
                return self.reject(market, err);
            }
        };

        let long_venue = self.venues.get(direction.long_slot());
        let short_venue = self.venues.get(direction.short_slot());

        info!(
            market = %market,
            long_venue = long_venue.name(),
            short_venue = short_venue.name(),
            magnitude = %magnitude,
            size_usd = %size_usd,
            amount = %amount,
            "Opening arbitrage position"
        );

        let long_order = match self
            .place_leg(long_venue, LegAction::OpenLong, market, Side::Long, amount, price)
            .await
        {
            Ok(order) => order,
            Err(source) => {
                warn!(
                    market = %market,
                    venue = long_venue.name(),
                    error = %source,
                    "Long leg failed, short leg not attempted"
                );
                return OpenOutcome::Failed(ExecutionError::LegFailureLong {
                    venue: long_venue.name().to_string(),
                    source,
                });
            }
        };

        if let Err(source) = self
            .place_leg(short_venue, LegAction::OpenShort, market, Side::Short, amount, price)
            .await
        {
            error!(
                severity = "critical",
                market = %market,
                long_venue = long_venue.name(),
                long_order_id = %long_order.id,
                short_venue = short_venue.name(),
                size_usd = %size_usd,
                error = %source,
                "Short leg failed after long leg filled; unhedged exposure requires manual remediation"
            );
            self.notifiers.notify_all(Event::UnhedgedLeg(UnhedgedEvent {
                market: market.to_string(),
                long_venue: long_venue.name().to_string(),
                long_order_id: long_order.id.clone(),
                short_venue: short_venue.name().to_string(),
                size_usd,
                reason: source.to_string(),
            }));
            return OpenOutcome::Failed(ExecutionError::LegFailureShortAsymmetric {
                long_venue: long_venue.name().to_string(),
                long_order_id: long_order.id,
                short_venue: short_venue.name().to_string(),
                source,
            });
        }

        let position = PositionInfo {
            market: market.clone(),
            direction,
            long_venue: VenueId::new(long_venue.name()),
            short_venue: VenueId::new(short_venue.name()),
            size_usd,
            created_at: Utc::now(),
        };
        reservation.commit(position.clone());

        info!(
            market = %market,
            long_venue = %position.long_venue,
            short_venue = %position.short_venue,
            size_usd = %size_usd,
            total_exposure = %self.ledger.total_exposure(),
            "Arbitrage position opened"
        );
        OpenOutcome::Opened(position)
    }

    /// Close the pair held on `market`, if any.
    pub async fn close(&self, market: &MarketId) -> CloseOutcome {
        let Some(recorded) = self.ledger.get(market) else {
            return CloseOutcome::NotOpen;
        };

        let sized = self
            .reference_price(market)
            .ok_or_else(|| RiskError::PriceUnavailable {
                market: market.to_string(),
            })
            .and_then(|price| order_amount(market, recorded.size_usd, price));
        let amount = match sized {
            Ok(amount) => amount,
            Err(err) => {
                warn!(market = %market, error = %err, "Cannot size closing orders, keeping position");
                return CloseOutcome::Deferred(err);
            }
        };

        let Some(position) = self.ledger.remove_if_present(market) else {
            return CloseOutcome::NotOpen;
        };

        info!(
            market = %market,
            long_venue = %position.long_venue,
            short_venue = %position.short_venue,
            size_usd = %position.size_usd,
            amount = %amount,
            "Closing arbitrage position"
        );

        let long_venue = self.venues.get(position.long_slot());
        let short_venue = self.venues.get(position.short_slot());

        let long_result = self
            .close_leg(long_venue, LegAction::CloseLong, &position, Side::Long, amount)
            .await;
        let short_result = self
            .close_leg(short_venue, LegAction::CloseShort, &position, Side::Short, amount)
            .await;

        let failed_legs = usize::from(long_result.is_err()) + usize::from(short_result.is_err());
        if failed_legs == 0 {
            info!(market = %market, "Arbitrage position closed");
            return CloseOutcome::Closed(position);
        }

        let error = ExecutionError::ClosePartialFailure {
            market: market.to_string(),
            failed_legs,
        };
        warn!(market = %market, failed_legs, "Closing incomplete, ledger entry not restored");
        CloseOutcome::Partial { position, error }
    }

    fn reference_price(&self, market: &MarketId) -> Option<Price> {
        self.prices
            .reference_price(market)
            .filter(|price| *price > Decimal::ZERO)
    }

    fn reject(&self, market: &MarketId, err: RiskError) -> OpenOutcome {
        info!(market = %market, reason = %err, "Opening rejected");
        self.notifiers
            .notify_all(Event::OpenRejected(RejectionEvent::new(market.as_str(), &err)));
        OpenOutcome::Rejected(err)
    }

    async fn place_leg(
        &self,
        venue: &Arc<dyn Venue>,
        action: LegAction,
        market: &MarketId,
        side: Side,
        amount: Decimal,
        price: Price,
    ) -> Result<Order, VenueError> {
        let result = bounded(
            venue.name(),
            self.settings.call_timeout,
            venue.place_order(market, side, OrderType::Market, amount, price),
        )
        .await;
        self.report_leg(venue, action, market, self.settings.position_size_usd, &result);
        result
    }

    async fn close_leg(
        &self,
        venue: &Arc<dyn Venue>,
        action: LegAction,
        position: &PositionInfo,
        side: Side,
        amount: Decimal,
    ) -> Result<Order, VenueError> {
        let result = bounded(
            venue.name(),
            self.settings.call_timeout,
            venue.close_position(&position.market, side, amount),
        )
        .await;
        if let Err(err) = &result {
            warn!(
                market = %position.market,
                venue = venue.name(),
                side = %side,
                error = %err,
                "Failed to close leg"
            );
        }
        self.report_leg(venue, action, &position.market, position.size_usd, &result);
        result
    }

    fn report_leg(
        &self,
        venue: &Arc<dyn Venue>,
        action: LegAction,
        market: &MarketId,
        size_usd: Usd,
        result: &Result<Order, VenueError>,
    ) {
        self.notifiers.notify_all(Event::LegExecuted(LegEvent {
            action,
            venue: venue.name().to_string(),
            market: market.to_string(),
            size_usd,
            error: result.as_ref().err().map(ToString::to_string),
        }));
    }
}

/// Base-asset amount for a USD notional at `price`.
fn order_amount(market: &MarketId, size_usd: Usd, price: Price) -> Result<Decimal, RiskError> {
    size_usd
        .checked_div(price)
        .ok_or_else(|| RiskError::AmountOutOfRange {
            market: market.to_string(),
            size_usd,
            price,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_amount_divides_notional() {
        let market = MarketId::from("ETH-USD");
        assert_eq!(order_amount(&market, dec!(20), dec!(4000)).unwrap(), dec!(0.005));
    }

    #[test]
    fn test_order_amount_overflow_is_an_error() {
        let market = MarketId::from("BTC-USD");
        let err = order_amount(&market, Decimal::MAX, dec!(0.00000001)).unwrap_err();
        assert!(matches!(err, RiskError::AmountOutOfRange { .. }));
    }
}
