//! Application services (use cases).
//!
//! These services tie the domain to the ports: the engine fetches a
//! rate snapshot, evaluates every configured market and hands opens and
//! closes to the coordinator, which owns all ledger writes.
//!
//! # Modules
//!
//! - [`ledger`]: One-position-per-market record with pending reservations
//! - [`evaluator`]: Pure open/close/hold decision
//! - [`fetcher`]: Per-cycle funding-rate snapshot
//! - [`coordinator`]: Two-leg opening and closing sequences
//! - [`engine`]: One evaluation cycle
//! - [`scheduler`]: Fixed-interval cycle driver with cooperative shutdown

mod call;
pub mod coordinator;
pub mod engine;
pub mod evaluator;
pub mod fetcher;
pub mod ledger;
pub mod scheduler;

pub use coordinator::{CloseOutcome, ExecutionCoordinator, ExecutionSettings, OpenOutcome};
pub use engine::{ArbitrageEngine, CycleReport, EngineSettings};
pub use evaluator::{evaluate, Decision};
pub use fetcher::RateSnapshotFetcher;
pub use ledger::{PositionLedger, Reservation};
pub use scheduler::{Scheduler, SchedulerState};
