//! Daemon configuration from environment variables

use std::env;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("Invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("{name} must be between {min} and {max} seconds, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

#[derive(Clone)]
pub struct DaemonConfig {
    /// Serial device the station bridge is attached to
    pub station_device: String,

    /// Driver type: `serial` or `simulator`
    pub station_driver: String,

    /// Serial line wait in seconds
    pub read_timeout: u64,

    /// SQLite history file path
    pub database_path: String,

    /// Weather Underground upload endpoint
    pub wu_url: String,

    /// PWS station id
    pub wu_station_id: String,

    /// PWS upload password
    pub wu_password: String,

    /// Snapshot period in seconds
    pub update_interval: u64,

    /// Warm-up before the first snapshot, seconds
    pub startup_grace: u64,
}

impl DaemonConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let station_device =
            env::var("STATION_DEVICE").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
        let station_driver = env::var("STATION_DRIVER").unwrap_or_else(|_| "serial".to_string());
        let read_timeout = parse_seconds("READ_TIMEOUT", "16")?;
        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "weather_history.db".to_string());

        let wu_url = env::var("WU_URL").unwrap_or_else(|_| acud_sinks::DEFAULT_ENDPOINT.to_string());
        let wu_station_id =
            env::var("WU_STATION_ID").map_err(|_| ConfigError::Missing("WU_STATION_ID"))?;
        let wu_password =
            env::var("WU_PASSWORD").map_err(|_| ConfigError::Missing("WU_PASSWORD"))?;

        let update_interval = parse_seconds("UPDATE_INTERVAL", "60")?;
        if !(1..=3600).contains(&update_interval) {
            return Err(ConfigError::OutOfRange {
                name: "UPDATE_INTERVAL",
                value: update_interval,
                min: 1,
                max: 3600,
            });
        }
        let startup_grace = parse_seconds("STARTUP_GRACE", "120")?;

        Ok(Self {
            station_device,
            station_driver,
            read_timeout,
            database_path,
            wu_url,
            wu_station_id,
            wu_password,
            update_interval,
            startup_grace,
        })
    }

    /// Number of ticks spanning one hour at the configured cadence
    pub fn hour_window_len(&self) -> usize {
        (3600 / self.update_interval) as usize
    }
}

// Hand-written so the upload password never reaches the logs.
impl fmt::Debug for DaemonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DaemonConfig")
            .field("station_device", &self.station_device)
            .field("station_driver", &self.station_driver)
            .field("read_timeout", &self.read_timeout)
            .field("database_path", &self.database_path)
            .field("wu_url", &self.wu_url)
            .field("wu_station_id", &self.wu_station_id)
            .field("wu_password", &"<redacted>")
            .field("update_interval", &self.update_interval)
            .field("startup_grace", &self.startup_grace)
            .finish()
    }
}

fn parse_seconds(name: &'static str, default: &str) -> Result<u64, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|_| ConfigError::Invalid { name, value })
}
