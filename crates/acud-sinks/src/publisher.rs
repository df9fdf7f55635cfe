//! Per-tick snapshot publisher

use crate::PublishError;
use acud_core::{Snapshot, SnapshotSink};
use tracing::debug;

/// Drives the persist and report destinations for each snapshot.
///
/// Both are always attempted; nothing is retried. The next tick supersedes
/// whatever this one failed to deliver.
pub struct SnapshotPublisher {
    persist: Box<dyn SnapshotSink>,
    report: Box<dyn SnapshotSink>,
}

impl SnapshotPublisher {
    pub fn new(persist: Box<dyn SnapshotSink>, report: Box<dyn SnapshotSink>) -> Self {
        Self { persist, report }
    }

    pub async fn publish(&mut self, snapshot: &Snapshot) -> Result<(), PublishError> {
        let persist_result = self.persist.emit(snapshot).await;
        let report_result = self.report.emit(snapshot).await;

        match (persist_result, report_result) {
            (Ok(()), Ok(())) => {
                debug!(date_time = snapshot.date_time, "Snapshot published");
                Ok(())
            }
            (Err(persist), Ok(())) => Err(PublishError::Persist(persist)),
            (Ok(()), Err(report)) => Err(PublishError::Report(report)),
            (Err(persist), Err(report)) => Err(PublishError::Both { persist, report }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acud_core::Timestamp;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct StubSink {
        name: &'static str,
        fail: bool,
        emitted: Arc<Mutex<Vec<Timestamp>>>,
    }

    impl StubSink {
        fn new(name: &'static str, fail: bool) -> (Self, Arc<Mutex<Vec<Timestamp>>>) {
            let emitted = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    name,
                    fail,
                    emitted: emitted.clone(),
                },
                emitted,
            )
        }
    }

    #[async_trait]
    impl SnapshotSink for StubSink {
        fn name(&self) -> &str {
            self.name
        }

        async fn emit(&mut self, snapshot: &Snapshot) -> anyhow::Result<()> {
            self.emitted.lock().unwrap().push(snapshot.date_time);
            if self.fail {
                return Err(anyhow!("{} sink down", self.name));
            }
            Ok(())
        }
    }

    fn snapshot_at(date_time: Timestamp) -> Snapshot {
        Snapshot {
            date_time,
            conditions: HashMap::new(),
            hourly_rain: 0.0,
            wind_gust: 0.0,
        }
    }

    #[tokio::test]
    async fn test_both_sinks_receive_snapshot() {
        let (persist, persisted) = StubSink::new("persist", false);
        let (report, reported) = StubSink::new("report", false);
        let mut publisher = SnapshotPublisher::new(Box::new(persist), Box::new(report));

        publisher.publish(&snapshot_at(60)).await.unwrap();

        assert_eq!(*persisted.lock().unwrap(), vec![60]);
        assert_eq!(*reported.lock().unwrap(), vec![60]);
    }

    #[tokio::test]
    async fn test_persist_failure_does_not_block_report() {
        let (persist, _persisted) = StubSink::new("persist", true);
        let (report, reported) = StubSink::new("report", false);
        let mut publisher = SnapshotPublisher::new(Box::new(persist), Box::new(report));

        let err = publisher.publish(&snapshot_at(60)).await.unwrap_err();

        assert!(matches!(err, PublishError::Persist(_)));
        assert_eq!(*reported.lock().unwrap(), vec![60]);
    }

    #[tokio::test]
    async fn test_report_failure_alone_is_typed() {
        let (persist, persisted) = StubSink::new("persist", false);
        let (report, _reported) = StubSink::new("report", true);
        let mut publisher = SnapshotPublisher::new(Box::new(persist), Box::new(report));

        let err = publisher.publish(&snapshot_at(60)).await.unwrap_err();

        assert!(matches!(err, PublishError::Report(_)));
        assert_eq!(*persisted.lock().unwrap(), vec![60]);
    }

    #[tokio::test]
    async fn test_dual_failure_reports_both() {
        let (persist, _) = StubSink::new("persist", true);
        let (report, _) = StubSink::new("report", true);
        let mut publisher = SnapshotPublisher::new(Box::new(persist), Box::new(report));

        let err = publisher.publish(&snapshot_at(60)).await.unwrap_err();
        assert!(matches!(err, PublishError::Both { .. }));
    }

    #[tokio::test]
    async fn test_failures_do_not_latch() {
        let (persist, _persisted) = StubSink::new("persist", true);
        let (report, reported) = StubSink::new("report", false);
        let mut publisher = SnapshotPublisher::new(Box::new(persist), Box::new(report));

        assert!(publisher.publish(&snapshot_at(60)).await.is_err());
        assert!(publisher.publish(&snapshot_at(120)).await.is_err());

        // The report sink still saw every tick.
        assert_eq!(*reported.lock().unwrap(), vec![60, 120]);
    }
}
