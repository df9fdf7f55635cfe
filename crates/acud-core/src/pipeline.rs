//! Snapshot pipeline traits

use crate::types::Snapshot;
use async_trait::async_trait;

/// Destination for finished snapshots.
///
/// Implementations take a published snapshot and deliver it somewhere
/// durable or remote. Failures are surfaced to the publisher, which decides
/// whether the other destinations still run.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    /// Sink name for logging.
    fn name(&self) -> &str;

    /// Deliver one snapshot.
    async fn emit(&mut self, snapshot: &Snapshot) -> anyhow::Result<()>;
}
