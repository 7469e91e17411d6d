//! Handler for `fundarb rates`: one snapshot, no orders.

use std::path::Path;

use tabled::{Table, Tabled};

use crate::application::{evaluate, Decision, RateSnapshotFetcher};
use crate::cli::output;
use crate::config::Config;
use crate::domain::{MarketId, Rate, RateSnapshot, VenueSlot};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_venues;

#[derive(Tabled)]
struct RateRow {
    #[tabled(rename = "Market")]
    market: String,
    #[tabled(rename = "Rate A")]
    rate_a: String,
    #[tabled(rename = "Rate B")]
    rate_b: String,
    #[tabled(rename = "Diff (A-B)")]
    diff: String,
    #[tabled(rename = "Signal")]
    signal: String,
}

fn rows(config: &Config, snapshot: &RateSnapshot) -> Vec<RateRow> {
    let threshold = config.strategy.min_funding_rate_diff;
    let name = |slot: VenueSlot| match slot {
        VenueSlot::A => config.venues.a.name.as_str(),
        VenueSlot::B => config.venues.b.name.as_str(),
    };
    let show = |rate: Option<Rate>| rate.map_or_else(|| "-".to_string(), |r| r.to_string());

    config
        .strategy
        .market_ids()
        .into_iter()
        .map(|market: MarketId| {
            let (diff, signal) = match snapshot.pair(&market) {
                None => ("-".to_string(), "missing".to_string()),
                Some(pair) => {
                    let signal = match evaluate(pair, None, threshold) {
                        Decision::Open { direction, .. } => format!(
                            "open: long {} / short {}",
                            name(direction.long_slot()),
                            name(direction.short_slot())
                        ),
                        Decision::Close | Decision::Hold => "hold".to_string(),
                    };
                    (pair.diff().to_string(), signal)
                }
            };
            RateRow {
                rate_a: show(snapshot.rate_a(&market)),
                rate_b: show(snapshot.rate_b(&market)),
                market: market.to_string(),
                diff,
                signal,
            }
        })
        .collect()
}

/// Fetch both venues once and print the per-market differential.
pub async fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path)?;
    let fetcher = RateSnapshotFetcher::new(build_venues(&config), config.strategy.call_timeout());
    let snapshot = fetcher.fetch().await?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Funding rates");
    output::field("Venue A", &config.venues.a.name);
    output::field("Venue B", &config.venues.b.name);
    output::field("Threshold", config.strategy.min_funding_rate_diff);
    println!();

    let table = Table::new(rows(&config, &snapshot)).to_string();
    output::lines(&table);

    if config.dry_run {
        output::note("dry_run is set: `fundarb run` would only log these openings");
    }
    output::note(&format!(
        "run {} to start trading",
        output::highlight("fundarb run")
    ));

    Ok(())
}
