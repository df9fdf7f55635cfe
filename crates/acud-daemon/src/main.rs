//! AcuDuino daemon - station ingest and snapshot publisher
//!
//! This binary coordinates:
//! - Sample collection from the serial station bridge (via drivers)
//! - Rolling hourly aggregation of rain and wind
//! - Per-minute snapshot persistence to SQLite and upload to Weather Underground

mod collector;
mod config;
mod scheduler;

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use acud_core::SnapshotSink;
use acud_db::HistoryStore;
use acud_ingest::{SampleSource, SerialDriver, SimulatorDriver};
use acud_rollup::SharedAggregator;
use acud_sinks::{SnapshotPublisher, SqliteSink, WundergroundSink};

use crate::collector::Collector;
use crate::config::DaemonConfig;
use crate::scheduler::Scheduler;

/// Synthetic sample cadence when running without hardware
const SIMULATOR_CADENCE_SECS: u64 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AcuDuino daemon");

    // Load configuration
    let config = DaemonConfig::from_env().context("Failed to load configuration")?;
    info!("Loaded configuration: {:?}", config);

    // Open the history file up front; a broken database is fatal
    let store =
        HistoryStore::open(&config.database_path).context("Failed to open history database")?;

    let persist = SqliteSink::new(store);
    let report = WundergroundSink::new(&config.wu_url, &config.wu_station_id, &config.wu_password)
        .context("Failed to configure Weather Underground upload")?;

    info!("Snapshot sinks ready: {} + {}", persist.name(), report.name());
    let publisher = SnapshotPublisher::new(Box::new(persist), Box::new(report));

    // Station driver
    let mut driver: Box<dyn SampleSource> = match config.station_driver.as_str() {
        "serial" => Box::new(SerialDriver::new(
            &config.station_device,
            Duration::from_secs(config.read_timeout),
        )),
        "simulator" => Box::new(SimulatorDriver::new(SIMULATOR_CADENCE_SECS)),
        other => anyhow::bail!("Unknown station driver: {}", other),
    };
    driver.start().await.context("Failed to start driver")?;
    info!("Station driver started: {}", driver.name());

    let aggregator = SharedAggregator::new(config.hour_window_len());

    // Both tasks watch the same shutdown flag
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut collector = Collector::new(driver, aggregator.clone(), shutdown_rx.clone());
    let collector_task = tokio::spawn(async move { collector.run().await });

    let mut scheduler = Scheduler::new(
        aggregator,
        publisher,
        Duration::from_secs(config.update_interval),
        Duration::from_secs(config.startup_grace),
        shutdown_rx,
    );
    let scheduler_task = tokio::spawn(async move { scheduler.run().await });

    info!("Daemon running - press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");
    let _ = shutdown_tx.send(true);

    collector_task.await.context("Collector task panicked")?;
    scheduler_task.await.context("Scheduler task panicked")?;

    info!("AcuDuino daemon stopped");
    Ok(())
}
