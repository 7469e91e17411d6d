//! Implementations of ports (hexagonal adapters).

pub mod notifier;
pub mod price;
pub mod venue;
