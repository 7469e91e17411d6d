//! Telegram notifications for leg executions and failures.
//!
//! Requires the `telegram` feature to be enabled.

mod format;
mod notifier;

pub use format::{escape_markdown, format_event_message};
pub use notifier::{TelegramConfig, TelegramNotifier};
