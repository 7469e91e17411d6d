//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams the arbitrage engine is written against. Adapters
//! implement them for concrete venues, price sources and notification
//! backends.
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │       Application        │
//!                 │  engine · coordinator    │
//!     ┌───────────┤  ledger · scheduler      ├───────────┐
//!     │           └──────────────────────────┘           │
//!     ▼                        ▼                         ▼
//! ┌────────┐           ┌──────────────┐           ┌──────────┐
//! │ Venue  │           │ Price Source │           │ Notifier │
//! └────────┘           └──────────────┘           └──────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`Venue`] - funding rates, order placement and position closing
//! - [`PriceSource`] - reference price lookup for notional conversion
//! - [`Notifier`] - fire-and-forget event notifications

mod notifier;
mod price;
mod venue;

pub use notifier::{
    Event, LegAction, LegEvent, LogNotifier, Notifier, NotifierRegistry, NullNotifier,
    RejectionEvent, UnhedgedEvent,
};
pub use price::PriceSource;
pub use venue::{BookLevel, OrderBook, Venue, VenuePair};
