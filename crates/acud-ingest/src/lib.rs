//! Station sample sources
//!
//! This crate provides the interface for receiving sample lines from the
//! weather station bridge: a serial-device driver for real hardware and a
//! simulator for development without it.

pub mod serial;
pub mod simulator;

pub use serial::*;
pub use simulator::*;

use acud_core::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Driver error: {0}")]
    DriverError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed line: {0}")]
    MalformedLine(#[from] ParseError),

    #[error("Timeout waiting for data")]
    Timeout,

    #[error("Stream disconnected")]
    Disconnected,
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Trait for all station sample sources
#[async_trait::async_trait]
pub trait SampleSource: Send + Sync {
    /// Source name/identifier
    fn name(&self) -> &str;

    /// Initialize the source and start sample collection
    async fn start(&mut self) -> IngestResult<()>;

    /// Stop the source and clean up resources
    async fn stop(&mut self) -> IngestResult<()>;

    /// Wait for the next sample line, parsed into name/value pairs
    async fn next_sample(&mut self) -> IngestResult<Vec<(String, String)>>;

    /// Check if source is currently active
    fn is_active(&self) -> bool;
}
