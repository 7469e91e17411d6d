//! Canonical test configurations.
//!
//! Two paper venues so nothing touches the network.

use crate::config::Config;

/// Valid configuration with two paper venues quoting BTC-USD and ETH-USD.
pub const PAPER_TOML: &str = r#"
dry_run = true

[strategy]
markets = ["BTC-USD", "ETH-USD"]
min_funding_rate_diff = 0.0001
position_size_usd = 20
max_position_usd = 100
interval_secs = 1
call_timeout_secs = 2

[venues.a]
kind = "paper"
name = "paper-a"

[venues.a.rates]
"BTC-USD" = 0.0005
"ETH-USD" = 0.0001

[venues.b]
kind = "paper"
name = "paper-b"

[venues.b.rates]
"BTC-USD" = 0.0001
"ETH-USD" = 0.00015

[prices]
"BTC-USD" = 50000
"ETH-USD" = 2500
"#;

/// [`PAPER_TOML`] parsed.
pub fn paper() -> Config {
    match Config::parse_toml(PAPER_TOML) {
        Ok(config) => config,
        Err(e) => panic!("test config must parse: {e}"),
    }
}

/// [`PAPER_TOML`] with one line replaced.
pub fn paper_toml_with(replace: &str, with: &str) -> String {
    PAPER_TOML.replace(replace, with)
}
