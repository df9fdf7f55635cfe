//! Serial device driver for the station bridge

use crate::{IngestError, IngestResult, SampleSource};
use acud_core::parse_line;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::time::{timeout, Duration};
use tracing::info;

type LineStream = Lines<BufReader<Box<dyn AsyncRead + Send + Sync + Unpin>>>;

/// Driver reading newline-delimited sample lines from the station device.
///
/// The device path is opened as a plain byte stream; the port is expected to
/// be configured for 9600 8N1 raw mode by the deployment. Each read waits up
/// to the configured timeout, and a quiet port surfaces as
/// `IngestError::Timeout` so the caller can keep polling. End of stream
/// surfaces as `IngestError::Disconnected` on every subsequent read.
pub struct SerialDriver {
    path: PathBuf,
    read_timeout: Duration,
    lines: Option<LineStream>,
    active: bool,
}

impl SerialDriver {
    /// Create a driver for the device at `path`
    pub fn new(path: impl Into<PathBuf>, read_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            read_timeout,
            lines: None,
            active: false,
        }
    }

    /// Create a driver over an already-open byte stream
    ///
    /// Used for replaying captured station output and in tests.
    pub fn from_reader(
        reader: impl AsyncRead + Send + Sync + Unpin + 'static,
        read_timeout: Duration,
    ) -> Self {
        let boxed: Box<dyn AsyncRead + Send + Sync + Unpin> = Box::new(reader);
        Self {
            path: PathBuf::new(),
            read_timeout,
            lines: Some(BufReader::new(boxed).lines()),
            active: false,
        }
    }
}

#[async_trait::async_trait]
impl SampleSource for SerialDriver {
    fn name(&self) -> &str {
        "serial"
    }

    async fn start(&mut self) -> IngestResult<()> {
        if self.active {
            return Err(IngestError::DriverError(
                "Driver already started".to_string(),
            ));
        }

        if self.lines.is_none() {
            let file = File::open(&self.path).await?;
            let boxed: Box<dyn AsyncRead + Send + Sync + Unpin> = Box::new(file);
            self.lines = Some(BufReader::new(boxed).lines());
        }

        self.active = true;
        info!(device = %self.path.display(), "Serial driver started");
        Ok(())
    }

    async fn stop(&mut self) -> IngestResult<()> {
        if !self.active {
            return Err(IngestError::DriverError("Driver not started".to_string()));
        }
        self.active = false;
        info!("Serial driver stopped");
        Ok(())
    }

    async fn next_sample(&mut self) -> IngestResult<Vec<(String, String)>> {
        if !self.active {
            return Err(IngestError::DriverError("Driver not active".to_string()));
        }
        let lines = self
            .lines
            .as_mut()
            .ok_or_else(|| IngestError::DriverError("Driver not started".to_string()))?;

        let line = timeout(self.read_timeout, lines.next_line())
            .await
            .map_err(|_| IngestError::Timeout)??;

        match line {
            Some(line) => Ok(parse_line(&line)?),
            None => Err(IngestError::Disconnected),
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
