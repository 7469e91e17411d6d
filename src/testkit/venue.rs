//! Mock [`Venue`] with scripted behaviour.
//!
//! - Rates are returned from a settable table; fetch failures are queued and
//!   consumed one per call.
//! - Order placement and close failures are sticky per side until cleared.
//! - A [`Gate`] can hold every order call until the test releases it, which
//!   makes interleavings deterministic.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::Semaphore;

use crate::domain::{FundingRate, MarketId, Order, OrderStatus, OrderType, Price, Rate, Side};
use crate::error::VenueError;
use crate::port::{OrderBook, Venue};

/// A recorded call against a [`ScriptedVenue`].
#[derive(Debug, Clone, PartialEq)]
pub enum VenueCall {
    FundingRates,
    PlaceOrder {
        market: MarketId,
        side: Side,
        amount: Decimal,
    },
    ClosePosition {
        market: MarketId,
        side: Side,
        amount: Decimal,
    },
}

/// Holds order calls until released.
///
/// Each call reaching the gate adds one `entered` permit, then waits for one
/// `release` permit. Permits accumulate, so releases may be issued early.
#[derive(Debug)]
pub struct Gate {
    entered: Semaphore,
    release: Semaphore,
}

impl Gate {
    fn new() -> Self {
        Self {
            entered: Semaphore::new(0),
            release: Semaphore::new(0),
        }
    }

    /// Wait until a call is parked at the gate.
    pub async fn wait_entered(&self) {
        if let Ok(permit) = self.entered.acquire().await {
            permit.forget();
        }
    }

    /// Let one parked (or the next) call through.
    pub fn open_once(&self) {
        self.release.add_permits(1);
    }

    async fn pass(&self) {
        self.entered.add_permits(1);
        if let Ok(permit) = self.release.acquire().await {
            permit.forget();
        }
    }
}

pub struct ScriptedVenue {
    name: String,
    rates: Mutex<Vec<FundingRate>>,
    fetch_failures: Mutex<VecDeque<VenueError>>,
    place_failures: Mutex<HashMap<Side, VenueError>>,
    close_failures: Mutex<HashMap<Side, VenueError>>,
    delay: Mutex<Duration>,
    gate: Mutex<Option<Arc<Gate>>>,
    calls: Mutex<Vec<VenueCall>>,
    order_seq: AtomicU32,
}

impl ScriptedVenue {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rates: Mutex::new(Vec::new()),
            fetch_failures: Mutex::new(VecDeque::new()),
            place_failures: Mutex::new(HashMap::new()),
            close_failures: Mutex::new(HashMap::new()),
            delay: Mutex::new(Duration::ZERO),
            gate: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            order_seq: AtomicU32::new(0),
        }
    }

    /// Replace the quoted rate for `market`, adding it if absent.
    pub fn set_rate(&self, market: &str, rate: Rate) {
        let mut rates = self.rates.lock();
        match rates.iter_mut().find(|r| r.market.as_str() == market) {
            Some(existing) => existing.rate = rate,
            None => rates.push(FundingRate::new(market, rate)),
        }
    }

    /// Stop quoting `market`.
    pub fn remove_rate(&self, market: &str) {
        self.rates.lock().retain(|r| r.market.as_str() != market);
    }

    /// Append a raw quote, duplicates included.
    pub fn push_rate(&self, rate: FundingRate) {
        self.rates.lock().push(rate);
    }

    /// The next `get_funding_rates` call fails with `error`.
    pub fn fail_next_fetch(&self, error: VenueError) {
        self.fetch_failures.lock().push_back(error);
    }

    /// Every `place_order` on `side` fails until cleared.
    pub fn fail_orders(&self, side: Side, error: VenueError) {
        self.place_failures.lock().insert(side, error);
    }

    /// Every `close_position` for a `side` leg fails until cleared.
    pub fn fail_closes(&self, side: Side, error: VenueError) {
        self.close_failures.lock().insert(side, error);
    }

    pub fn clear_failures(&self) {
        self.place_failures.lock().clear();
        self.close_failures.lock().clear();
        self.fetch_failures.lock().clear();
    }

    /// Sleep this long inside every call.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    /// Install a gate on order calls and return it.
    pub fn gate(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::new());
        *self.gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn remove_gate(&self) {
        *self.gate.lock() = None;
    }

    pub fn calls(&self) -> Vec<VenueCall> {
        self.calls.lock().clone()
    }

    /// Order placements and closes, fetches excluded.
    pub fn order_calls(&self) -> Vec<VenueCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| !matches!(c, VenueCall::FundingRates))
            .cloned()
            .collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, VenueCall::FundingRates))
            .count()
    }

    async fn pause(&self) {
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }
    }

    fn order(&self, market: &MarketId, side: Side, amount: Decimal, price: Price) -> Order {
        let seq = self.order_seq.fetch_add(1, Ordering::SeqCst);
        Order {
            id: format!("{}-{seq}", self.name),
            market: market.clone(),
            side,
            order_type: OrderType::Market,
            price,
            amount,
            status: OrderStatus::Filled,
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
impl Venue for ScriptedVenue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_funding_rates(&self) -> Result<Vec<FundingRate>, VenueError> {
        self.calls.lock().push(VenueCall::FundingRates);
        self.pause().await;
        if let Some(error) = self.fetch_failures.lock().pop_front() {
            return Err(error);
        }
        Ok(self.rates.lock().clone())
    }

    async fn place_order(
        &self,
        market: &MarketId,
        side: Side,
        _order_type: OrderType,
        amount: Decimal,
        price: Price,
    ) -> Result<Order, VenueError> {
        self.calls.lock().push(VenueCall::PlaceOrder {
            market: market.clone(),
            side,
            amount,
        });
        self.pass_gate().await;
        self.pause().await;
        if let Some(error) = self.place_failures.lock().get(&side) {
            return Err(error.clone());
        }
        Ok(self.order(market, side, amount, price))
    }

    async fn close_position(
        &self,
        market: &MarketId,
        side: Side,
        amount: Decimal,
    ) -> Result<Order, VenueError> {
        self.calls.lock().push(VenueCall::ClosePosition {
            market: market.clone(),
            side,
            amount,
        });
        self.pass_gate().await;
        self.pause().await;
        if let Some(error) = self.close_failures.lock().get(&side) {
            return Err(error.clone());
        }
        Ok(self.order(market, side.opposite(), amount, Decimal::ZERO))
    }

    async fn get_orderbook(&self, market: &MarketId) -> Result<OrderBook, VenueError> {
        Ok(OrderBook::empty(market.clone()))
    }

    async fn get_order_status(
        &self,
        order_id: &str,
        _market: &MarketId,
    ) -> Result<Order, VenueError> {
        Err(VenueError::Api {
            venue: self.name.clone(),
            message: format!("order {order_id} not tracked"),
        })
    }

    async fn cancel_order(&self, _order_id: &str, _market: &MarketId) -> Result<(), VenueError> {
        Ok(())
    }

    async fn get_balance(&self, _asset: &str) -> Result<Decimal, VenueError> {
        Ok(Decimal::ZERO)
    }

    fn set_testnet(&mut self, _testnet: bool) {}
}

/// Convenience error for scripting failures.
pub fn api_error(venue: &str, message: &str) -> VenueError {
    VenueError::Api {
        venue: venue.to_string(),
        message: message.to_string(),
    }
}
