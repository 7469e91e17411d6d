//! Per-cycle funding-rate snapshot.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::call::bounded;
use crate::domain::{FundingRate, RateSnapshot};
use crate::error::FetchError;
use crate::port::{Venue, VenuePair};

/// Queries both venues and builds the market -> rate lookups for one cycle.
#[derive(Debug, Clone)]
pub struct RateSnapshotFetcher {
    venues: VenuePair,
    call_timeout: Duration,
}

impl RateSnapshotFetcher {
    pub fn new(venues: VenuePair, call_timeout: Duration) -> Self {
        Self {
            venues,
            call_timeout,
        }
    }

    /// Fetch both venues' rates. Either failure aborts the snapshot.
    pub async fn fetch(&self) -> Result<RateSnapshot, FetchError> {
        let (rates_a, rates_b) = tokio::join!(
            self.fetch_one(self.venues.a()),
            self.fetch_one(self.venues.b()),
        );
        let rates_a = rates_a?;
        let rates_b = rates_b?;

        debug!(
            venue_a = self.venues.a().name(),
            quotes_a = rates_a.len(),
            venue_b = self.venues.b().name(),
            quotes_b = rates_b.len(),
            "Fetched funding rates"
        );

        Ok(RateSnapshot::from_rates(rates_a, rates_b))
    }

    async fn fetch_one(&self, venue: &Arc<dyn Venue>) -> Result<Vec<FundingRate>, FetchError> {
        bounded(venue.name(), self.call_timeout, venue.get_funding_rates())
            .await
            .map_err(|source| FetchError {
                venue: venue.name().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MarketId;
    use crate::testkit::{api_error, ScriptedVenue};
    use rust_decimal_macros::dec;

    fn fetcher() -> (Arc<ScriptedVenue>, Arc<ScriptedVenue>, RateSnapshotFetcher) {
        let a = Arc::new(ScriptedVenue::new("venue-a"));
        let b = Arc::new(ScriptedVenue::new("venue-b"));
        let pair = VenuePair::new(a.clone(), b.clone());
        (a, b, RateSnapshotFetcher::new(pair, Duration::from_secs(1)))
    }

    #[tokio::test]
    async fn test_snapshot_pairs_markets_and_keeps_last_quote() {
        let (a, b, fetcher) = fetcher();
        a.push_rate(FundingRate::new("BTC-USD", dec!(0.0001)));
        a.push_rate(FundingRate::new("BTC-USD", dec!(0.0003)));
        b.set_rate("BTC-USD", dec!(0.0002));
        a.set_rate("ETH-USD", dec!(0.0005));

        let snapshot = fetcher.fetch().await.unwrap();

        let pair = snapshot.pair(&MarketId::from("BTC-USD")).unwrap();
        assert_eq!(pair.rate_a, dec!(0.0003));
        assert_eq!(pair.rate_b, dec!(0.0002));
        assert!(snapshot.pair(&MarketId::from("ETH-USD")).is_none());
    }

    #[tokio::test]
    async fn test_either_failure_aborts() {
        let (a, b, fetcher) = fetcher();
        b.fail_next_fetch(api_error("venue-b", "503"));

        let err = fetcher.fetch().await.unwrap_err();
        assert_eq!(err.venue, "venue-b");
        assert_eq!(a.fetch_count(), 1);

        a.fail_next_fetch(api_error("venue-a", "503"));
        b.fail_next_fetch(api_error("venue-b", "503"));
        let err = fetcher.fetch().await.unwrap_err();
        assert_eq!(err.venue, "venue-a");
    }
}
