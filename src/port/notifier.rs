//! Notifier port for event notifications.
//!
//! This module defines the trait for sending notifications about leg
//! executions, rejected openings and unhedged exposure.

use rust_decimal::Decimal;

use crate::error::RiskError;

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// A leg placement or close attempt finished (success or failure).
    LegExecuted(LegEvent),
    /// An opening was refused before any order was placed.
    OpenRejected(RejectionEvent),
    /// Long leg filled but the short leg failed. Needs manual reconciliation.
    UnhedgedLeg(UnhedgedEvent),
    /// A venue's rate query failed and the cycle was skipped.
    SnapshotFailed {
        /// The venue whose query failed.
        venue: String,
        /// The failure reason.
        reason: String,
    },
    /// Scheduler started.
    EngineStarted {
        /// Number of configured markets.
        markets: usize,
    },
    /// Scheduler stopped.
    EngineStopped {
        /// Positions still open at shutdown (not persisted).
        open_positions: usize,
    },
}

/// Which leg operation a [`LegEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegAction {
    OpenLong,
    OpenShort,
    CloseLong,
    CloseShort,
}

impl LegAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenLong => "OPEN LONG",
            Self::OpenShort => "OPEN SHORT",
            Self::CloseLong => "CLOSE LONG",
            Self::CloseShort => "CLOSE SHORT",
        }
    }
}

impl std::fmt::Display for LegAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single leg attempt.
#[derive(Debug, Clone)]
pub struct LegEvent {
    pub action: LegAction,
    pub venue: String,
    pub market: String,
    pub size_usd: Decimal,
    /// `None` on success.
    pub error: Option<String>,
}

impl LegEvent {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Opening refused by a risk or pricing check.
#[derive(Debug, Clone)]
pub struct RejectionEvent {
    pub market: String,
    pub reason: String,
}

impl RejectionEvent {
    /// Create a new rejection event from a market and risk error.
    #[must_use]
    pub fn new(market: &str, error: &RiskError) -> Self {
        Self {
            market: market.to_string(),
            reason: error.to_string(),
        }
    }
}

/// Stray long leg left on a venue after the short leg failed.
#[derive(Debug, Clone)]
pub struct UnhedgedEvent {
    pub market: String,
    pub long_venue: String,
    pub long_order_id: String,
    pub short_venue: String,
    pub size_usd: Decimal,
    pub reason: String,
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget: `notify` returns nothing and a failing
/// backend must never affect the caller.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method should not block or perform slow I/O synchronously
/// - Consider spawning async tasks for slow operations
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Send an event to all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        self.notify_all(event);
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{error, info, warn};
        match event {
            Event::LegExecuted(e) => match e.error {
                None => info!(
                    action = %e.action,
                    venue = %e.venue,
                    market = %e.market,
                    size_usd = %e.size_usd,
                    "Leg executed"
                ),
                Some(reason) => warn!(
                    action = %e.action,
                    venue = %e.venue,
                    market = %e.market,
                    size_usd = %e.size_usd,
                    error = %reason,
                    "Leg failed"
                ),
            },
            Event::OpenRejected(e) => {
                info!(market = %e.market, reason = %e.reason, "Opening rejected");
            }
            Event::UnhedgedLeg(e) => {
                error!(
                    severity = "critical",
                    market = %e.market,
                    long_venue = %e.long_venue,
                    long_order_id = %e.long_order_id,
                    short_venue = %e.short_venue,
                    size_usd = %e.size_usd,
                    reason = %e.reason,
                    "Unhedged long leg, manual intervention required"
                );
            }
            Event::SnapshotFailed { venue, reason } => {
                warn!(venue = %venue, reason = %reason, "Funding-rate snapshot failed");
            }
            Event::EngineStarted { markets } => {
                info!(markets, "Engine started");
            }
            Event::EngineStopped { open_positions } => {
                info!(open_positions, "Engine stopped");
            }
        }
    }
}
