//! Query operations for the history table

use crate::schema::HistoryRow;
use crate::{DbResult, HistoryStore};
use rusqlite::{params, OptionalExtension};
use tracing::{debug, instrument};

impl HistoryStore {
    /// Append one history record
    ///
    /// The trailing column is reserved and always written as NULL.
    #[instrument(skip(self, record))]
    pub fn insert_history(&self, record: &HistoryRow) -> DbResult<()> {
        self.lock().execute(
            "INSERT INTO weather_station_data VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)",
            params![
                record.date_time,
                record.tempf,
                record.windspeedmph,
                record.winddir,
                record.humidity,
                record.rainin,
                record.rainin_hr,
            ],
        )?;

        debug!("Inserted history record for timestamp {}", record.date_time);
        Ok(())
    }

    /// Get the most recent history record
    #[instrument(skip(self))]
    pub fn latest_history(&self) -> DbResult<Option<HistoryRow>> {
        let record = self
            .lock()
            .query_row(
                "SELECT dateTime, tempf, windspeedmph, winddir, humidity, rainin, rainin_hr
                 FROM weather_station_data ORDER BY dateTime DESC LIMIT 1",
                [],
                HistoryRow::from_row,
            )
            .optional()?;

        Ok(record)
    }

    /// Get count of history records
    #[instrument(skip(self))]
    pub fn count_history(&self) -> DbResult<i64> {
        let count = self.lock().query_row(
            "SELECT COUNT(*) FROM weather_station_data",
            [],
            |row| row.get(0),
        )?;

        Ok(count)
    }
}
