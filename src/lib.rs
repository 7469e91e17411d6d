//! fundarb - Perpetual-futures funding-rate arbitrage across two venues.
//!
//! Each cycle the engine fetches funding rates from both venues, and for every
//! configured market opens a market-neutral long/short pair when the rate
//! differential strictly exceeds the threshold, or closes the existing pair
//! once the differential is no longer favourable.
//!
//! # Modules
//!
//! - [`domain`] - Venue-agnostic types: markets, rates, orders, positions
//! - [`port`] - Capability traits: venues, reference prices, notifiers
//! - [`application`] - Ledger, evaluator, fetcher, coordinator, engine, scheduler
//! - [`adapter`] - Paper and Extended venues, static prices, Telegram
//! - [`config`] - Configuration loading from TOML files
//! - [`infrastructure`] - Wiring and process lifecycle
//! - [`cli`] - Command-line handlers
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Telegram notifications via `teloxide`
//! - `testkit` - Test doubles shared by integration tests

pub mod adapter;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
