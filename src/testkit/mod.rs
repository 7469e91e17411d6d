//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`venue`] - [`ScriptedVenue`](venue::ScriptedVenue): mock venue with
//!   scripted rates, failures, delays and call recording.
//! - [`doubles`] - `FixedPriceSource` and `RecordingNotifier`.
//! - [`harness`] - Engine, coordinator and ledger wired over two scripted venues.
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod doubles;
pub mod harness;
pub mod venue;

pub use doubles::{FixedPriceSource, RecordingNotifier};
pub use harness::{position, Harness, HarnessSettings};
pub use venue::{api_error, Gate, ScriptedVenue, VenueCall};
