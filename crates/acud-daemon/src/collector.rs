//! Sample collection loop

use acud_ingest::{IngestError, SampleSource};
use acud_rollup::SharedAggregator;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Pulls sample lines from the driver into the shared aggregator.
///
/// The loop never gives up on a running driver: a quiet port is simply
/// retried, a bad line is dropped with a warning, and anything else backs
/// off for a second before trying again.
pub struct Collector {
    driver: Box<dyn SampleSource>,
    aggregator: SharedAggregator,
    shutdown: watch::Receiver<bool>,
}

impl Collector {
    pub fn new(
        driver: Box<dyn SampleSource>,
        aggregator: SharedAggregator,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            driver,
            aggregator,
            shutdown,
        }
    }

    /// Run until the shutdown channel fires
    pub async fn run(&mut self) {
        info!("Collector started: {}", self.driver.name());

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => break,
                result = self.driver.next_sample() => match result {
                    Ok(line_fields) => self.aggregator.apply_line(&line_fields),
                    Err(IngestError::Timeout) => {
                        // Quiet port; keep waiting.
                    }
                    Err(IngestError::MalformedLine(_)) => {
                        warn!("Badly formed data, skipping");
                    }
                    Err(e) => {
                        error!("Sample read failed: {}", e);
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                },
            }
        }

        if let Err(e) = self.driver.stop().await {
            warn!("Error stopping driver: {}", e);
        }
        info!("Collector stopped");
    }
}
