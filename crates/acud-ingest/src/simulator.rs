//! Simulated station for development without hardware

use crate::{IngestError, IngestResult, SampleSource};
use acud_core::parse_line;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::time::{sleep, Duration};
use tracing::info;

/// Emits one synthetic, well-formed sample line per interval.
///
/// Conditions drift deterministically off the wall clock; the rain counter
/// creeps upward and wraps at 100 like the real sensor, so the hourly
/// derivations get exercised end to end.
pub struct SimulatorDriver {
    interval: u64,
    active: bool,
    rain_counter: f64,
}

impl SimulatorDriver {
    /// Create a simulator emitting one line per `interval` seconds
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            active: false,
            rain_counter: 0.0,
        }
    }

    fn generate_line(&mut self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;

        // Clock-derived wobble in the -5..+5 range
        let drift = ((now % 100) as f64 / 10.0) - 5.0;

        // Constant light drizzle, wrapping like the real counter
        self.rain_counter = (self.rain_counter + 0.01) % 100.0;

        format!(
            "tempf:{:.1},windspeedmph:{:.1},winddir:{},humidity:{},rainin:{:.2}",
            68.0 + drift,
            5.0 + drift.abs(),
            now % 360,
            (65.0 + drift) as i64,
            self.rain_counter
        )
    }
}

#[async_trait::async_trait]
impl SampleSource for SimulatorDriver {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn start(&mut self) -> IngestResult<()> {
        if self.active {
            return Err(IngestError::DriverError(
                "Driver already started".to_string(),
            ));
        }
        self.active = true;
        info!("Simulator driver started with {}s interval", self.interval);
        Ok(())
    }

    async fn stop(&mut self) -> IngestResult<()> {
        if !self.active {
            return Err(IngestError::DriverError("Driver not started".to_string()));
        }
        self.active = false;
        info!("Simulator driver stopped");
        Ok(())
    }

    async fn next_sample(&mut self) -> IngestResult<Vec<(String, String)>> {
        if !self.active {
            return Err(IngestError::DriverError("Driver not active".to_string()));
        }

        // The real station reports on its own cadence; mimic it.
        sleep(Duration::from_secs(self.interval)).await;

        let line = self.generate_line();
        Ok(parse_line(&line)?)
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
