//! Venue-agnostic domain types: markets, funding rates, orders, positions.

pub mod direction;
pub mod funding;
pub mod id;
pub mod money;
pub mod order;
pub mod position;

pub use direction::{Direction, VenueSlot};
pub use funding::{FundingRate, RatePair, RateSnapshot};
pub use id::{MarketId, VenueId};
pub use money::{Price, Rate, Usd};
pub use order::{Order, OrderStatus, OrderType, Side};
pub use position::PositionInfo;
