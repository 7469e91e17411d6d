//! Telegram notification configuration.

use serde::Deserialize;

/// Telegram notification switch. Credentials come from `TELEGRAM_BOT_TOKEN`
/// and `TELEGRAM_CHAT_ID`.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Enable telegram notifications.
    #[serde(default)]
    pub enabled: bool,
    /// Send successful leg executions too; failures are always sent.
    #[serde(default = "default_true")]
    pub notify_successes: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            notify_successes: default_true(),
        }
    }
}

impl TelegramAppConfig {
    /// True when both credential variables are set.
    #[must_use]
    pub fn credentials_present() -> bool {
        std::env::var("TELEGRAM_BOT_TOKEN").is_ok() && std::env::var("TELEGRAM_CHAT_ID").is_ok()
    }
}
