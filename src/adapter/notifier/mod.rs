//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for notification backends beyond
//! the built-in log notifier.

#[cfg(feature = "telegram")]
pub mod telegram;

#[cfg(feature = "telegram")]
pub use telegram::{TelegramConfig, TelegramNotifier};
