//! Message formatting for Telegram notifications.

use rust_decimal::Decimal;

use super::notifier::TelegramConfig;
use crate::port::Event;

/// Format an event into a Telegram message, or None if the event should be skipped.
pub fn format_event_message(event: &Event, config: &TelegramConfig) -> Option<String> {
    match event {
        Event::LegExecuted(e) => {
            if e.is_success() && !config.notify_successes {
                return None;
            }
            let status = if e.is_success() {
                "✅ SUCCESS"
            } else {
                "❌ FAILED"
            };

            let mut msg = format!(
                "*{} Position Event*\n\
                \n\
                *Status:* {}\n\
                *Venue:* `{}`\n\
                *Market:* `{}`\n\
                *Position Size:* `{} USD`",
                escape_markdown(e.action.as_str()),
                status,
                escape_markdown(&e.venue),
                escape_markdown(&e.market),
                escape_markdown(&usd(e.size_usd)),
            );
            if let Some(err) = &e.error {
                msg.push_str(&format!("\n*Error:* `{}`", escape_markdown(err)));
            }
            Some(msg)
        }
        Event::UnhedgedLeg(e) => Some(format!(
            "🚨 *CRITICAL: Unhedged Position*\n\
            \n\
            📋 Market: `{}`\n\
            📈 Long on `{}` \\(order `{}`\\)\n\
            📉 Short failed on `{}`\n\
            💵 Size: `{} USD`\n\
            ❗ {}\n\
            \n\
            Manual remediation required",
            escape_markdown(&e.market),
            escape_markdown(&e.long_venue),
            escape_markdown(&e.long_order_id),
            escape_markdown(&e.short_venue),
            escape_markdown(&usd(e.size_usd)),
            escape_markdown(&e.reason),
        )),
        Event::OpenRejected(e) => Some(format!(
            "⚠️ *Opening Rejected*\n\
            \n\
            📋 Market: `{}`\n\
            🚫 Reason: {}",
            escape_markdown(&e.market),
            escape_markdown(&e.reason)
        )),
        Event::EngineStarted { markets } => Some(format!(
            "▶️ *Funding arbitrage started*\n\
            \n\
            Watching `{markets}` market\\(s\\)"
        )),
        Event::EngineStopped { open_positions } => Some(format!(
            "⏹️ *Funding arbitrage stopped*\n\
            \n\
            Open positions: `{open_positions}`"
        )),
        Event::SnapshotFailed { .. } => None,
    }
}

fn usd(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.',
        '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}
