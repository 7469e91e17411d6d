//! Extended exchange REST client.
//!
//! Market data (funding rates, mark prices, order books) and the account
//! balance are read from the public REST API. Market orders are priced off
//! the current mark price with a slippage bound. Order submission on Extended
//! needs Starknet-signed order objects, which this client does not produce:
//! placements and closes are acknowledged locally and logged as simulated.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{FundingRate, MarketId, Order, OrderStatus, OrderType, Price, Side};
use crate::error::VenueError;
use crate::port::{BookLevel, OrderBook, Venue};

pub const EXTENDED_MAINNET_URL: &str = "https://api.starknet.extended.exchange";
pub const EXTENDED_TESTNET_URL: &str = "https://api.starknet.sepolia.extended.exchange";

const USER_AGENT: &str = concat!("fundarb/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Market buys may fill up to 5% above mark, market sells down to 5% below.
const BUY_SLIPPAGE: Decimal = dec!(1.05);
const SELL_SLIPPAGE: Decimal = dec!(0.95);

/// Standard Extended response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    data: Option<T>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketDto {
    name: String,
    market_stats: MarketStatsDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketStatsDto {
    funding_rate: Decimal,
    /// Next funding time in epoch milliseconds.
    #[serde(default)]
    next_funding_rate: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceDto {
    balance: Decimal,
}

#[derive(Debug, Deserialize)]
struct OrderBookDto {
    #[serde(default)]
    bid: Vec<LevelDto>,
    #[serde(default)]
    ask: Vec<LevelDto>,
}

#[derive(Debug, Deserialize)]
struct LevelDto {
    qty: Decimal,
    price: Decimal,
}

impl From<LevelDto> for BookLevel {
    fn from(level: LevelDto) -> Self {
        Self {
            price: level.price,
            size: level.qty,
        }
    }
}

fn millis_to_utc(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

fn funding_rates(markets: Vec<MarketDto>) -> Vec<FundingRate> {
    markets
        .into_iter()
        .map(|m| FundingRate {
            market: MarketId::new(m.name),
            rate: m.market_stats.funding_rate,
            next_funding_time: m.market_stats.next_funding_rate.and_then(millis_to_utc),
        })
        .collect()
}

/// Worst acceptable fill for a market order on `side`.
fn protected_price(mark: Price, side: Side) -> Option<Price> {
    match side {
        Side::Long => mark.checked_mul(BUY_SLIPPAGE),
        Side::Short => mark.checked_mul(SELL_SLIPPAGE),
    }
}

/// REST client for the Extended perpetuals exchange.
pub struct ExtendedVenue {
    name: String,
    http: HttpClient,
    api_key: Option<String>,
    base_url: String,
    /// Explicit base URL from configuration; survives `set_testnet`.
    url_override: Option<String>,
    testnet: bool,
}

impl ExtendedVenue {
    #[must_use]
    pub fn new(name: impl Into<String>, api_key: Option<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            name: name.into(),
            http,
            api_key,
            base_url: EXTENDED_MAINNET_URL.to_string(),
            url_override: None,
            testnet: false,
        }
    }

    /// Pin the base URL regardless of network selection.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        self.base_url = url.clone();
        self.url_override = Some(url);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current mark price for a market.
    pub async fn mark_price(&self, market: &MarketId) -> Result<Price, VenueError> {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct StatsDto {
            mark_price: Decimal,
        }

        let path = format!("/api/v1/info/markets/{}/stats", market.as_str());
        let stats: StatsDto = self.get(&path, false).await?;
        Ok(stats.mark_price)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, auth: bool) -> Result<T, VenueError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(venue = %self.name, url = %url, "GET");

        let mut request = self.http.get(&url);
        if auth {
            let Some(key) = &self.api_key else {
                return Err(VenueError::Api {
                    venue: self.name.clone(),
                    message: "API key not configured".to_string(),
                });
            };
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(VenueError::Api {
                venue: self.name.clone(),
                message: format!("{status}: {body}"),
            });
        }

        self.decode(&body)
    }

    fn decode<T: DeserializeOwned>(&self, body: &str) -> Result<T, VenueError> {
        let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| VenueError::Api {
            venue: self.name.clone(),
            message: format!("invalid response: {e}"),
        })?;

        if envelope.status != "OK" {
            let message = envelope
                .error
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("status {}", envelope.status));
            return Err(VenueError::Api {
                venue: self.name.clone(),
                message,
            });
        }

        envelope.data.ok_or_else(|| VenueError::Api {
            venue: self.name.clone(),
            message: "response missing data".to_string(),
        })
    }

    /// Price to submit with an order: the caller's for limits, the
    /// slippage-bounded mark for market orders.
    async fn order_price(
        &self,
        market: &MarketId,
        side: Side,
        order_type: OrderType,
        price: Price,
    ) -> Result<Price, VenueError> {
        if order_type != OrderType::Market {
            return Ok(price);
        }
        let mark = self.mark_price(market).await?;
        protected_price(mark, side).ok_or_else(|| VenueError::Rejected {
            venue: self.name.clone(),
            reason: format!("mark price {mark} out of range for {market}"),
        })
    }

    fn simulated_order(
        &self,
        market: &MarketId,
        side: Side,
        order_type: OrderType,
        amount: Decimal,
        price: Price,
    ) -> Order {
        let order = Order {
            id: format!("extended-simulated-{}", Uuid::new_v4()),
            market: market.clone(),
            side,
            order_type,
            price,
            amount,
            status: OrderStatus::New,
            timestamp: Utc::now(),
        };
        warn!(
            venue = %self.name,
            simulated = true,
            market = %market,
            side = %side,
            amount = %amount,
            order_id = %order.id,
            "Order acknowledged locally, not sent to exchange"
        );
        order
    }
}

#[async_trait]
impl Venue for ExtendedVenue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_funding_rates(&self) -> Result<Vec<FundingRate>, VenueError> {
        let markets: Vec<MarketDto> = self.get("/api/v1/info/markets", false).await?;
        Ok(funding_rates(markets))
    }

    async fn place_order(
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
        let price = self.order_price(market, side, order_type, price).await?;
        Ok(self.simulated_order(market, side, order_type, amount, price))
    }

    async fn close_position(
        &self,
        market: &MarketId,
        side: Side,
        amount: Decimal,
    ) -> Result<Order, VenueError> {
        self.place_order(market, side.opposite(), OrderType::Market, amount, Decimal::ZERO)
            .await
    }

    async fn get_orderbook(&self, market: &MarketId) -> Result<OrderBook, VenueError> {
        let path = format!("/api/v1/info/markets/{}/orderbook", market.as_str());
        let book: OrderBookDto = self.get(&path, false).await?;
        Ok(OrderBook {
            market: market.clone(),
            bids: book.bid.into_iter().map(BookLevel::from).collect(),
            asks: book.ask.into_iter().map(BookLevel::from).collect(),
        })
    }

    async fn get_order_status(
        &self,
        _order_id: &str,
        _market: &MarketId,
    ) -> Result<Order, VenueError> {
        Err(VenueError::Unsupported {
            venue: self.name.clone(),
            operation: "get_order_status",
        })
    }

    async fn cancel_order(&self, order_id: &str, market: &MarketId) -> Result<(), VenueError> {
        warn!(
            venue = %self.name,
            simulated = true,
            market = %market,
            order_id = %order_id,
            "Cancel acknowledged locally, not sent to exchange"
        );
        Ok(())
    }

    async fn get_balance(&self, _asset: &str) -> Result<Decimal, VenueError> {
        let balance: BalanceDto = self.get("/api/v1/user/balance", true).await?;
        Ok(balance.balance)
    }

    fn set_testnet(&mut self, testnet: bool) {
        self.testnet = testnet;
        self.base_url = match &self.url_override {
            Some(url) => url.clone(),
            None if testnet => EXTENDED_TESTNET_URL.to_string(),
            None => EXTENDED_MAINNET_URL.to_string(),
        };
    }
}
