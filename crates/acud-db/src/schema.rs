//! Schema types for the station history file
//!
//! IMPORTANT: the column layout matches what existing dashboards already
//! read from this file. Do not modify column names or order.

use serde::{Deserialize, Serialize};

/// One appended history record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    /// Timestamp (Unix epoch seconds) of the tick that produced the row
    #[serde(rename = "dateTime")]
    pub date_time: i64,

    /// Outdoor temperature, degrees Fahrenheit
    pub tempf: Option<f64>,

    /// Instantaneous wind speed, mph
    pub windspeedmph: Option<f64>,

    /// Wind direction, compass degrees
    pub winddir: Option<f64>,

    /// Relative humidity, percent
    pub humidity: Option<f64>,

    /// Raw cumulative rain counter, inches
    pub rainin: Option<f64>,

    /// Rainfall over the trailing hour, inches
    pub rainin_hr: f64,
}

impl HistoryRow {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date_time: row.get(0)?,
            tempf: row.get(1)?,
            windspeedmph: row.get(2)?,
            winddir: row.get(3)?,
            humidity: row.get(4)?,
            rainin: row.get(5)?,
            rainin_hr: row.get(6)?,
        })
    }
}

/// Table names in the history file
pub mod tables {
    pub const HISTORY: &str = "weather_station_data";
}

/// Issued on every open; a no-op once the table exists
pub const CREATE_HISTORY_TABLE: &str = "
CREATE TABLE IF NOT EXISTS weather_station_data (
    dateTime     INTEGER NOT NULL,
    tempf        REAL,
    windspeedmph REAL,
    winddir      REAL,
    humidity     REAL,
    rainin       REAL,
    rainin_hr    REAL,
    extra        REAL -- reserved, never written
);";
