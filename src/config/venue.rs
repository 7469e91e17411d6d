//! Venue selection and connection settings.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Venue implementation to instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueKind {
    /// Locally simulated venue with configured rates.
    Paper,
    /// Extended exchange REST API.
    Extended,
}

impl VenueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Extended => "extended",
        }
    }
}

/// One `[venues.a]` / `[venues.b]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    pub kind: VenueKind,
    /// Display name; also selects the `<NAME>_API_KEY` variable.
    pub name: String,
    /// Base URL override. Defaults to the venue's mainnet or testnet URL.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Paper venue funding rates by market.
    #[serde(default)]
    pub rates: BTreeMap<String, Decimal>,
    /// Paper venue starting USD balance (default: 10000).
    #[serde(default = "default_paper_balance")]
    pub balance: Decimal,
    /// Loaded from the environment, never from the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_paper_balance() -> Decimal {
    Decimal::from(10_000)
}

impl VenueConfig {
    /// Environment variable holding this venue's API key.
    #[must_use]
    pub fn api_key_var(&self) -> String {
        let prefix: String = self
            .name
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{prefix}_API_KEY")
    }
}

/// `[venues]` section: the two venues being compared.
#[derive(Debug, Clone, Deserialize)]
pub struct VenuesConfig {
    pub a: VenueConfig,
    pub b: VenueConfig,
}
