//! Open arbitrage positions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Direction, MarketId, Usd, VenueId, VenueSlot};

/// A hedged long/short pair held across the two venues.
///
/// Only created once both opening legs have been acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub market: MarketId,
    pub direction: Direction,
    pub long_venue: VenueId,
    pub short_venue: VenueId,
    pub size_usd: Usd,
    pub created_at: DateTime<Utc>,
}

impl PositionInfo {
    #[must_use]
    pub fn long_slot(&self) -> VenueSlot {
        self.direction.long_slot()
    }

    #[must_use]
    pub fn short_slot(&self) -> VenueSlot {
        self.direction.short_slot()
    }
}
