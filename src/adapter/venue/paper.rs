//! Locally simulated venue.
//!
//! Funding rates come from configuration. Orders are acknowledged immediately
//! and kept in memory so status and cancel queries have something to answer:
//! resting limit orders until cancelled, settled orders up to a fixed history.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::domain::{FundingRate, MarketId, Order, OrderStatus, OrderType, Price, Rate, Side};
use crate::error::VenueError;
use crate::port::{OrderBook, Venue};

/// Filled and cancelled orders retained for status queries.
pub const SETTLED_ORDER_HISTORY: usize = 256;

#[derive(Debug, Default)]
struct OrderTable {
    orders: HashMap<String, Order>,
    /// Settled order ids, oldest first.
    settled: VecDeque<String>,
}

impl OrderTable {
    fn settle(&mut self, order_id: &str) {
        self.settled.push_back(order_id.to_string());
        while self.settled.len() > SETTLED_ORDER_HISTORY {
            if let Some(oldest) = self.settled.pop_front() {
                self.orders.remove(&oldest);
            }
        }
    }
}

/// Simulated venue for dry runs and paper trading.
pub struct PaperVenue {
    name: String,
    testnet: bool,
    rates: RwLock<HashMap<MarketId, Rate>>,
    orders: Mutex<OrderTable>,
    balance: Decimal,
}

impl PaperVenue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            testnet: false,
            rates: RwLock::new(HashMap::new()),
            orders: Mutex::new(OrderTable::default()),
            balance: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn with_rates<I, M>(self, rates: I) -> Self
    where
        I: IntoIterator<Item = (M, Rate)>,
        M: Into<MarketId>,
    {
        {
            let mut table = self.rates.write();
            for (market, rate) in rates {
                table.insert(market.into(), rate);
            }
        }
        self
    }

    /// Fixed balance reported for USD and USDC.
    #[must_use]
    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    #[must_use]
    pub const fn is_testnet(&self) -> bool {
        self.testnet
    }

    /// Number of orders currently retained.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.lock().orders.len()
    }

    fn record(
        &self,
        market: &MarketId,
        side: Side,
        order_type: OrderType,
        amount: Decimal,
        price: Price,
    ) -> Result<Order, VenueError> {
        if amount <= Decimal::ZERO {
            return Err(VenueError::Rejected {
                venue: self.name.clone(),
                reason: format!("amount must be positive, got {amount}"),
            });
        }

        let status = match order_type {
            OrderType::Market => OrderStatus::Filled,
            OrderType::Limit => OrderStatus::New,
        };
        let order = Order {
            id: format!("{}-{}", self.name.to_lowercase(), Uuid::new_v4()),
            market: market.clone(),
            side,
            order_type,
            price,
            amount,
            status,
            timestamp: Utc::now(),
        };

        info!(
            venue = %self.name,
            market = %market,
            side = %side,
            amount = %amount,
            order_id = %order.id,
            "Paper order acknowledged"
        );
        let mut table = self.orders.lock();
        table.orders.insert(order.id.clone(), order.clone());
        if order.status == OrderStatus::Filled {
            table.settle(&order.id);
        }
        Ok(order)
    }

    fn unknown_order(&self, order_id: &str) -> VenueError {
        VenueError::Api {
            venue: self.name.clone(),
            message: format!("order {order_id} not found"),
        }
    }
}

#[async_trait]
impl Venue for PaperVenue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_funding_rates(&self) -> Result<Vec<FundingRate>, VenueError> {
        let mut rates: Vec<FundingRate> = self
            .rates
            .read()
            .iter()
            .map(|(market, rate)| FundingRate::new(market.clone(), *rate))
            .collect();
        rates.sort_by(|a, b| a.market.cmp(&b.market));
        Ok(rates)
    }

    async fn place_order(
        &self,
        market: &MarketId,
        side: Side,
        order_type: OrderType,
        amount: Decimal,
        price: Price,
    ) -> Result<Order, VenueError> {
        self.record(market, side, order_type, amount, price)
    }

    async fn close_position(
        &self,
        market: &MarketId,
        side: Side,
        amount: Decimal,
    ) -> Result<Order, VenueError> {
        self.record(market, side.opposite(), OrderType::Market, amount, Decimal::ZERO)
    }

    async fn get_orderbook(&self, market: &MarketId) -> Result<OrderBook, VenueError> {
        Ok(OrderBook::empty(market.clone()))
    }

    async fn get_order_status(
        &self,
        order_id: &str,
        _market: &MarketId,
    ) -> Result<Order, VenueError> {
        self.orders
            .lock()
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| self.unknown_order(order_id))
    }

    async fn cancel_order(&self, order_id: &str, _market: &MarketId) -> Result<(), VenueError> {
        let mut table = self.orders.lock();
        let order = table
            .orders
            .get_mut(order_id)
            .ok_or_else(|| self.unknown_order(order_id))?;

        match order.status {
            OrderStatus::New => {
                order.status = OrderStatus::Cancelled;
                table.settle(order_id);
                Ok(())
            }
            status => Err(VenueError::Rejected {
                venue: self.name.clone(),
                reason: format!("order {order_id} cannot be cancelled in status {status:?}"),
            }),
        }
    }

    async fn get_balance(&self, asset: &str) -> Result<Decimal, VenueError> {
        if asset.eq_ignore_ascii_case("USD") || asset.eq_ignore_ascii_case("USDC") {
            Ok(self.balance)
        } else {
            Ok(Decimal::ZERO)
        }
    }

    fn set_testnet(&mut self, testnet: bool) {
        self.testnet = testnet;
    }
}
