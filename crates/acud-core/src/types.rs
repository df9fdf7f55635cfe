//! Field values and snapshots exchanged between the station and the sinks

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Timestamp type (Unix epoch seconds)
pub type Timestamp = i64;

/// One sensor field value as received on the wire.
///
/// Raw values are parsed into the narrowest numeric form; anything
/// non-numeric is kept verbatim so unrecognized fields survive a round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Classify a raw wire value.
    pub fn from_raw(raw: &str) -> Self {
        if let Ok(v) = raw.parse::<i64>() {
            FieldValue::Integer(v)
        } else if let Ok(v) = raw.parse::<f64>() {
            FieldValue::Float(v)
        } else {
            FieldValue::Text(raw.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

/// Current conditions plus the hourly derived values, produced once per tick.
///
/// A snapshot is immutable once built; the publisher borrows it for the
/// duration of one persist/report cycle and does not retain it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Snapshot {
    /// Unix timestamp of the tick that produced this snapshot
    #[serde(rename = "dateTime")]
    pub date_time: Timestamp,

    /// Every field the station has reported, most recent value per field
    #[serde(flatten)]
    pub conditions: HashMap<String, FieldValue>,

    /// Rainfall over the trailing hour, inches
    #[serde(rename = "rainin_hr")]
    pub hourly_rain: f64,

    /// Peak wind speed over the trailing hour, mph
    #[serde(rename = "windgustmph")]
    pub wind_gust: f64,
}

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.conditions.get(name)
    }

    /// Numeric view of a field, if it currently holds one.
    pub fn numeric(&self, name: &str) -> Option<f64> {
        self.conditions.get(name).and_then(FieldValue::as_f64)
    }
}

/// Wire names of the fields the station is expected to report.
pub mod fields {
    /// Outdoor temperature, degrees Fahrenheit
    pub const TEMPERATURE: &str = "tempf";
    /// Instantaneous wind speed, mph
    pub const WIND_SPEED: &str = "windspeedmph";
    /// Wind direction, compass degrees
    pub const WIND_DIR: &str = "winddir";
    /// Relative humidity, percent
    pub const HUMIDITY: &str = "humidity";
    /// Cumulative rainfall counter, inches, wraps at 100
    pub const RAIN_COUNTER: &str = "rainin";

    /// Fields seeded with a zero default when an aggregator is built
    pub const KNOWN: [&str; 5] = [TEMPERATURE, WIND_SPEED, WIND_DIR, HUMIDITY, RAIN_COUNTER];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_classification() {
        assert_eq!(FieldValue::from_raw("44"), FieldValue::Integer(44));
        assert_eq!(FieldValue::from_raw("-7"), FieldValue::Integer(-7));
        assert_eq!(FieldValue::from_raw("72.5"), FieldValue::Float(72.5));
        assert_eq!(
            FieldValue::from_raw("calm"),
            FieldValue::Text("calm".to_string())
        );
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(FieldValue::Integer(44).as_f64(), Some(44.0));
        assert_eq!(FieldValue::Float(72.5).as_f64(), Some(72.5));
        assert_eq!(FieldValue::Text("calm".into()).as_f64(), None);
    }

    #[test]
    fn test_wire_rendering() {
        assert_eq!(FieldValue::Integer(225).to_string(), "225");
        assert_eq!(FieldValue::Float(3.4).to_string(), "3.4");
        assert_eq!(FieldValue::Float(0.0).to_string(), "0");
        assert_eq!(FieldValue::Text("NE".into()).to_string(), "NE");
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let mut conditions = HashMap::new();
        conditions.insert(fields::TEMPERATURE.to_string(), FieldValue::Float(72.5));
        let snapshot = Snapshot {
            date_time: 1700000000,
            conditions,
            hourly_rain: 0.8,
            wind_gust: 9.0,
        };

        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["dateTime"], 1700000000);
        assert_eq!(json["tempf"], 72.5);
        assert_eq!(json["rainin_hr"], 0.8);
        assert_eq!(json["windgustmph"], 9.0);
    }
}
