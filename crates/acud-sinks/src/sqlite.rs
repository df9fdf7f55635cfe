//! History persist sink

use acud_core::{fields, Snapshot, SnapshotSink};
use acud_db::{HistoryRow, HistoryStore};
use anyhow::Result;
use async_trait::async_trait;

/// Appends one history row per snapshot.
///
/// The row carries the raw counter, not the gust; the gust only travels in
/// the upload. Inserts run on the blocking pool since rusqlite is
/// synchronous.
pub struct SqliteSink {
    store: HistoryStore,
}

impl SqliteSink {
    pub fn new(store: HistoryStore) -> Self {
        Self { store }
    }

    fn to_row(snapshot: &Snapshot) -> HistoryRow {
        HistoryRow {
            date_time: snapshot.date_time,
            tempf: snapshot.numeric(fields::TEMPERATURE),
            windspeedmph: snapshot.numeric(fields::WIND_SPEED),
            winddir: snapshot.numeric(fields::WIND_DIR),
            humidity: snapshot.numeric(fields::HUMIDITY),
            rainin: snapshot.numeric(fields::RAIN_COUNTER),
            rainin_hr: snapshot.hourly_rain,
        }
    }
}

#[async_trait]
impl SnapshotSink for SqliteSink {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn emit(&mut self, snapshot: &Snapshot) -> Result<()> {
        let store = self.store.clone();
        let row = Self::to_row(snapshot);
        tokio::task::spawn_blocking(move || store.insert_history(&row)).await??;
        Ok(())
    }
}
