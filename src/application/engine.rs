//! One evaluation cycle over the configured markets.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::coordinator::{CloseOutcome, ExecutionCoordinator, OpenOutcome};
use super::evaluator::{evaluate, Decision};
use super::fetcher::RateSnapshotFetcher;
use crate::domain::{MarketId, Rate};
use crate::error::FetchError;
use crate::port::{Event, NotifierRegistry};

/// Strategy parameters consumed by the engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Markets evaluated each cycle, in order.
    pub markets: Vec<MarketId>,
    /// Differential that must be strictly exceeded to open.
    pub min_funding_rate_diff: Rate,
    /// Log openings instead of placing orders.
    pub dry_run: bool,
}

/// Per-cycle counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub opened: usize,
    pub closed: usize,
    /// Markets missing from a snapshot, or closes deferred for lack of a price.
    pub skipped: usize,
    pub rejected: usize,
    /// Leg failures on open or close.
    pub failed: usize,
    /// Openings only logged because of dry-run mode.
    pub dry_run: usize,
}

/// Fetch, evaluate and dispatch for every configured market.
pub struct ArbitrageEngine {
    fetcher: RateSnapshotFetcher,
    coordinator: Arc<ExecutionCoordinator>,
    notifiers: Arc<NotifierRegistry>,
    settings: EngineSettings,
}

impl ArbitrageEngine {
    pub fn new(
        fetcher: RateSnapshotFetcher,
        coordinator: Arc<ExecutionCoordinator>,
        notifiers: Arc<NotifierRegistry>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            fetcher,
            coordinator,
            notifiers,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub fn coordinator(&self) -> &Arc<ExecutionCoordinator> {
        &self.coordinator
    }

    #[must_use]
    pub fn notifiers(&self) -> &Arc<NotifierRegistry> {
        &self.notifiers
    }

    /// Run one cycle. A failed snapshot aborts the cycle before any market
    /// is evaluated.
    pub async fn run_cycle(&self) -> Result<CycleReport, FetchError> {
        let snapshot = match self.fetcher.fetch().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(venue = %err.venue, error = %err.source, "Skipping cycle");
                self.notifiers.notify_all(Event::SnapshotFailed {
                    venue: err.venue.clone(),
                    reason: err.source.to_string(),
                });
                return Err(err);
            }
        };

        let ledger = self.coordinator.ledger();
        let mut report = CycleReport::default();

        for market in &self.settings.markets {
            let Some(pair) = snapshot.pair(market) else {
                debug!(market = %market, "Market missing from a venue snapshot, skipping");
                report.skipped += 1;
                continue;
            };

            let existing = ledger.get(market);
            let decision = evaluate(pair, existing.as_ref(), self.settings.min_funding_rate_diff);
            debug!(
                market = %market,
                rate_a = %pair.rate_a,
                rate_b = %pair.rate_b,
                diff = %pair.diff(),
                ?decision,
                "Evaluated market"
            );

            match decision {
                Decision::Hold => {}
                Decision::Open {
                    direction,
                    magnitude,
                } => {
                    if self.settings.dry_run {
                        info!(
                            market = %market,
                            ?direction,
                            magnitude = %magnitude,
                            "Dry-run: would open arbitrage position"
                        );
                        report.dry_run += 1;
                        continue;
                    }
                    match self.coordinator.open(market, direction, magnitude).await {
                        OpenOutcome::Opened(_) => report.opened += 1,
                        OpenOutcome::Rejected(_) => report.rejected += 1,
                        OpenOutcome::Failed(_) => report.failed += 1,
                    }
                }
                Decision::Close => match self.coordinator.close(market).await {
                    CloseOutcome::Closed(_) => report.closed += 1,
                    CloseOutcome::Partial { .. } => {
                        report.closed += 1;
                        report.failed += 1;
                    }
                    CloseOutcome::Deferred(_) => report.skipped += 1,
                    CloseOutcome::NotOpen => {}
                },
            }
        }

        Ok(report)
    }
}
