//! Venue port for funding-rate queries and order execution.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{FundingRate, MarketId, Order, OrderType, Price, Side, VenueSlot};
use crate::error::VenueError;

/// A single price level of an order book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookLevel {
    pub price: Price,
    pub size: Decimal,
}

/// Order book snapshot returned by [`Venue::get_orderbook`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBook {
    pub market: MarketId,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    #[must_use]
    pub fn empty(market: MarketId) -> Self {
        Self {
            market,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }
}

/// Uniform contract for one perpetual-futures venue.
///
/// The arbitrage engine only uses [`name`](Venue::name),
/// [`get_funding_rates`](Venue::get_funding_rates),
/// [`place_order`](Venue::place_order) and
/// [`close_position`](Venue::close_position); the rest serve the CLI and
/// operator tooling.
#[async_trait]
pub trait Venue: Send + Sync {
    /// Venue name for logging and notifications.
    fn name(&self) -> &str;

    /// Current funding rates for every market the venue lists.
    async fn get_funding_rates(&self) -> Result<Vec<FundingRate>, VenueError>;

    /// Place an order opening (or adding to) a position.
    async fn place_order(
        &self,
        market: &MarketId,
        side: Side,
        order_type: OrderType,
        amount: Decimal,
        price: Price,
    ) -> Result<Order, VenueError>;

    /// Close `amount` of the position held on `side`.
    async fn close_position(
        &self,
        market: &MarketId,
        side: Side,
        amount: Decimal,
    ) -> Result<Order, VenueError>;

    async fn get_orderbook(&self, market: &MarketId) -> Result<OrderBook, VenueError>;

    async fn get_order_status(&self, order_id: &str, market: &MarketId)
        -> Result<Order, VenueError>;

    async fn cancel_order(&self, order_id: &str, market: &MarketId) -> Result<(), VenueError>;

    async fn get_balance(&self, asset: &str) -> Result<Decimal, VenueError>;

    /// Switch between mainnet and testnet endpoints. Applied before the
    /// venue is shared.
    fn set_testnet(&mut self, testnet: bool);
}

/// The two venues the engine arbitrages between.
#[derive(Clone)]
pub struct VenuePair {
    a: Arc<dyn Venue>,
    b: Arc<dyn Venue>,
}

impl VenuePair {
    pub fn new(a: Arc<dyn Venue>, b: Arc<dyn Venue>) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub fn get(&self, slot: VenueSlot) -> &Arc<dyn Venue> {
        match slot {
            VenueSlot::A => &self.a,
            VenueSlot::B => &self.b,
        }
    }

    #[must_use]
    pub fn a(&self) -> &Arc<dyn Venue> {
        &self.a
    }

    #[must_use]
    pub fn b(&self) -> &Arc<dyn Venue> {
        &self.b
    }
}

impl std::fmt::Debug for VenuePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VenuePair")
            .field("a", &self.a.name())
            .field("b", &self.b.name())
            .finish()
    }
}
