//! Venue adapters.

mod extended;
mod paper;

use std::sync::Arc;

use tracing::info;

pub use extended::{ExtendedVenue, EXTENDED_MAINNET_URL, EXTENDED_TESTNET_URL};
pub use paper::PaperVenue;

use crate::config::{VenueConfig, VenueKind};
use crate::port::Venue;

/// Build a venue from its configuration, selecting mainnet or testnet before
/// the venue is shared.
#[must_use]
pub fn build_venue(config: &VenueConfig, testnet: bool) -> Arc<dyn Venue> {
    let mut venue: Box<dyn Venue> = match config.kind {
        VenueKind::Paper => Box::new(
            PaperVenue::new(config.name.trim())
                .with_rates(config.rates.iter().map(|(m, r)| (m.as_str(), *r)))
                .with_balance(config.balance),
        ),
        VenueKind::Extended => {
            let venue = ExtendedVenue::new(config.name.trim(), config.api_key.clone());
            match &config.api_url {
                Some(url) => Box::new(venue.with_base_url(url.as_str())),
                None => Box::new(venue),
            }
        }
    };
    venue.set_testnet(testnet);

    info!(
        venue = venue.name(),
        kind = config.kind.as_str(),
        testnet,
        "Venue initialized"
    );
    Arc::from(venue)
}
