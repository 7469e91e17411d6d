//! Fixed-interval driver for evaluation cycles.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::engine::ArbitrageEngine;
use crate::port::Event;

/// Lifecycle of the scheduler loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Runs cycles back to back at a fixed period until shutdown.
///
/// Cycles never overlap: a tick that arrives while a cycle is running is
/// skipped, not queued. Shutdown is observed between cycles, so an in-flight
/// cycle always completes.
pub struct Scheduler {
    engine: Arc<ArbitrageEngine>,
    period: Duration,
    state: Mutex<SchedulerState>,
}

impl Scheduler {
    pub fn new(engine: Arc<ArbitrageEngine>, period: Duration) -> Self {
        Self {
            engine,
            period,
            state: Mutex::new(SchedulerState::Idle),
        }
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    /// Drive cycles until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// Returns the number of completed cycles. A stopped scheduler does not
    /// restart.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> u64 {
        {
            let mut state = self.state.lock();
            if *state == SchedulerState::Stopped {
                return 0;
            }
            *state = SchedulerState::Running;
        }

        let markets = self.engine.settings().markets.len();
        info!(
            markets,
            interval_secs = self.period.as_secs(),
            dry_run = self.engine.settings().dry_run,
            "Scheduler started"
        );
        self.engine
            .notifiers()
            .notify_all(Event::EngineStarted { markets });

        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut cycles = 0u64;

        if !*shutdown.borrow() {
            loop {
                tokio::select! {
                    biased;
                    result = shutdown.changed() => {
                        match result {
                            Ok(()) => {
                                if *shutdown.borrow() {
                                    info!("Shutdown signal received");
                                    break;
                                }
                            }
                            Err(_) => {
                                info!("Shutdown channel closed");
                                break;
                            }
                        }
                    }
                    _ = interval.tick() => {
                        match self.engine.run_cycle().await {
                            Ok(report) => info!(
                                cycle = cycles + 1,
                                opened = report.opened,
                                closed = report.closed,
                                skipped = report.skipped,
                                rejected = report.rejected,
                                failed = report.failed,
                                "Cycle complete"
                            ),
                            Err(err) => warn!(cycle = cycles + 1, error = %err, "Cycle aborted"),
                        }
                        cycles += 1;
                    }
                }
            }
        }

        *self.state.lock() = SchedulerState::Stopped;
        let open_positions = self.engine.coordinator().ledger().len();
        if open_positions > 0 {
            warn!(
                open_positions,
                "Stopping with open positions; they are not persisted"
            );
        }
        self.engine
            .notifiers()
            .notify_all(Event::EngineStopped { open_positions });
        info!(cycles, "Scheduler stopped");
        cycles
    }
}
