//! Process lifecycle: start the scheduler, stop it on Ctrl+C.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::bootstrap::{build_engine, build_notifier_registry, build_price_source, build_venues};
use crate::application::Scheduler;
use crate::config::Config;
use crate::error::{Error, Result};

/// Build everything from `config` and run cycles until `shutdown` fires.
pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
    info!(
        testnet = config.testnet,
        dry_run = config.dry_run,
        venue_a = %config.venues.a.name,
        venue_b = %config.venues.b.name,
        "Starting fundarb"
    );

    for market in config.unpriced_markets() {
        warn!(market = %market, "No reference price configured; openings will be refused");
    }

    let notifiers = Arc::new(build_notifier_registry(&config));
    info!(notifiers = notifiers.len(), "Notifiers initialized");

    let venues = build_venues(&config);
    let prices = Arc::new(build_price_source(&config));
    let engine = Arc::new(build_engine(&config, venues, prices, notifiers));

    let scheduler = Scheduler::new(engine, config.strategy.interval());
    scheduler.run(shutdown).await;
    Ok(())
}

/// Run in the foreground until Ctrl+C, then wait for the current cycle.
pub async fn run_until_interrupted(config: Config) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut app_handle = tokio::spawn(async move { run_with_shutdown(config, shutdown_rx).await });

    tokio::select! {
        result = &mut app_handle => {
            map_app_result(result)?;
            info!("fundarb stopped");
            return Ok(());
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received (Ctrl+C), waiting for the current cycle");
            let _ = shutdown_tx.send(true);
        }
    }

    map_app_result(app_handle.await)?;
    info!("fundarb stopped");
    Ok(())
}

fn map_app_result(result: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(error)) => {
            error!(error = %error, "Application exited with error");
            Err(error)
        }
        Err(error) => {
            error!(error = %error, "Application task join failed");
            Err(Error::Task(error.to_string()))
        }
    }
}
