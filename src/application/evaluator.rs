//! Open/close/hold decisions for one market.
//!
//! Opening requires a strictly larger differential than the threshold;
//! closing fires once the spread seen from the short leg is zero or negative.

use rust_decimal::Decimal;

use crate::domain::{Direction, PositionInfo, Rate, RatePair};

/// What the engine should do with a market this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Open a pair; `magnitude` is `|diff|`.
    Open { direction: Direction, magnitude: Rate },
    /// Unwind the existing pair.
    Close,
    Hold,
}

/// Decide the action for a market with rates on both venues.
#[must_use]
pub fn evaluate(pair: RatePair, existing: Option<&PositionInfo>, threshold: Rate) -> Decision {
    let diff = pair.diff();

    match existing {
        None => {
            if diff.abs() <= threshold {
                return Decision::Hold;
            }
            match Direction::from_diff(diff) {
                Some(direction) => Decision::Open {
                    direction,
                    magnitude: diff.abs(),
                },
                None => Decision::Hold,
            }
        }
        Some(position) => {
            if position.direction.favourable_spread(diff) <= Decimal::ZERO {
                Decision::Close
            } else {
                Decision::Hold
            }
        }
    }
}
