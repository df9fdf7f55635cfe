//! Snapshot scheduler

use acud_core::fields;
use acud_rollup::SharedAggregator;
use acud_sinks::SnapshotPublisher;
use chrono::Utc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{info, warn};

/// Closes the aggregation window once per period and publishes the result.
///
/// One unconditional grace sleep lets the collector populate the current
/// conditions, then a steady ticker takes over: the first tick fires as
/// soon as the grace elapses, the rest once per period. Shutdown is only
/// observed between ticks, so an in-flight publish always completes.
pub struct Scheduler {
    aggregator: SharedAggregator,
    publisher: SnapshotPublisher,
    period: Duration,
    grace: Duration,
    shutdown: watch::Receiver<bool>,
}

impl Scheduler {
    pub fn new(
        aggregator: SharedAggregator,
        publisher: SnapshotPublisher,
        period: Duration,
        grace: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            aggregator,
            publisher,
            period,
            grace,
            shutdown,
        }
    }

    /// Run until the shutdown channel fires
    pub async fn run(&mut self) {
        info!(
            "Scheduler started: first snapshot in {}s, then every {}s",
            self.grace.as_secs(),
            self.period.as_secs()
        );

        tokio::select! {
            _ = self.shutdown.changed() => {
                info!("Scheduler stopped");
                return;
            }
            _ = sleep(self.grace) => {}
        }

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => break,
                _ = ticker.tick() => self.publish_tick().await,
            }
        }

        info!("Scheduler stopped");
    }

    async fn publish_tick(&mut self) {
        let snapshot = self.aggregator.tick(Utc::now().timestamp());

        info!(
            "Temp: {}F Wind: {}MPH {} Humidity: {} Rainfall: {} (cntr {})",
            snapshot.numeric(fields::TEMPERATURE).unwrap_or(0.0),
            snapshot.numeric(fields::WIND_SPEED).unwrap_or(0.0),
            snapshot.numeric(fields::WIND_DIR).unwrap_or(0.0),
            snapshot.numeric(fields::HUMIDITY).unwrap_or(0.0),
            snapshot.hourly_rain,
            snapshot.numeric(fields::RAIN_COUNTER).unwrap_or(0.0),
        );

        if let Err(e) = self.publisher.publish(&snapshot).await {
            warn!("Publish failed: {}", e);
        }
    }
}
