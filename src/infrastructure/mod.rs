//! Wiring: builds adapters and application services from configuration
//! and owns the process-level run loop.

pub mod bootstrap;
pub mod runtime;
