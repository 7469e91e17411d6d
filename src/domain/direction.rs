//! Which venue carries which leg of an arbitrage pair.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Rate;

/// One of the two configured venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VenueSlot {
    A,
    B,
}

impl VenueSlot {
    /// The other venue.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Leg assignment of an arbitrage pair.
///
/// The venue quoting the higher funding rate is shorted (collects funding),
/// the one quoting the lower rate is bought (pays less funding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Venue A rate was higher: long on B, short on A.
    LongBShortA,
    /// Venue B rate was higher: long on A, short on B.
    LongAShortB,
}

impl Direction {
    /// Direction for a differential `rate_a - rate_b`.
    ///
    /// Returns `None` for a zero differential, which never opens.
    #[must_use]
    pub fn from_diff(diff: Rate) -> Option<Self> {
        if diff > Decimal::ZERO {
            Some(Self::LongBShortA)
        } else if diff < Decimal::ZERO {
            Some(Self::LongAShortB)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn long_slot(self) -> VenueSlot {
        match self {
            Self::LongBShortA => VenueSlot::B,
            Self::LongAShortB => VenueSlot::A,
        }
    }

    #[must_use]
    pub const fn short_slot(self) -> VenueSlot {
        self.long_slot().other()
    }

    /// Differential seen from the short leg: positive while the shorted venue
    /// still quotes the higher rate.
    #[must_use]
    pub fn favourable_spread(self, diff: Rate) -> Rate {
        match self.short_slot() {
            VenueSlot::A => diff,
            VenueSlot::B => -diff,
        }
    }
}
