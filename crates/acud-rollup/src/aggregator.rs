//! Rolling aggregation of station samples into per-tick snapshots

use crate::CircularWindow;
use acud_core::{fields, FieldValue, Snapshot, Timestamp};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// The station's cumulative rain counter wraps back to zero at 100 inches
const RAIN_COUNTER_ROLLOVER: f64 = 100.0;

/// Accumulates samples between ticks and derives the rolling hourly metrics.
///
/// `window_len` is the number of ticks covering one hour. Both windows hold
/// raw samples (cumulative counter values for rain, instantaneous speeds for
/// wind), never deltas.
pub struct RollingAggregator {
    conditions: HashMap<String, FieldValue>,
    rain_window: CircularWindow<f64>,
    wind_window: CircularWindow<f64>,
}

impl RollingAggregator {
    /// Create an aggregator whose windows span `window_len` ticks.
    ///
    /// The well-known fields are seeded with zero so the first tick can
    /// produce a complete snapshot even before any sample arrives.
    pub fn new(window_len: usize) -> Self {
        let mut conditions = HashMap::new();
        for field in fields::KNOWN {
            conditions.insert(field.to_string(), FieldValue::Float(0.0));
        }

        Self {
            conditions,
            rain_window: CircularWindow::with_capacity(window_len),
            wind_window: CircularWindow::with_capacity(window_len),
        }
    }

    /// Record one field sample. The last write before a tick wins.
    ///
    /// Unknown field names are stored as-is and flow through to snapshots.
    // TODO: sanity-check jumps in the rain counter (more than an inch
    // between consecutive samples is sensor noise, not rain).
    pub fn apply_sample(&mut self, name: &str, raw: &str) {
        self.conditions
            .insert(name.to_string(), FieldValue::from_raw(raw));
    }

    /// Close one scheduling period: derive the hourly metrics, rotate the
    /// windows, and return the finished snapshot.
    pub fn tick(&mut self, date_time: Timestamp) -> Snapshot {
        let rain_counter = self.numeric(fields::RAIN_COUNTER);
        let wind_speed = self.numeric(fields::WIND_SPEED);

        // First tick: the unseen past hour counts as rain-free, so the rain
        // window starts at the current counter value. The wind window starts
        // at zero since there is no gust history to fill in.
        if !self.rain_window.is_primed() {
            self.rain_window.prime(rain_counter);
        }
        if !self.wind_window.is_primed() {
            self.wind_window.prime(0.0);
        }

        let evicted = self
            .rain_window
            .rotate(rain_counter)
            .unwrap_or(rain_counter);
        let mut hourly_rain = rain_counter - evicted;
        if hourly_rain < 0.0 {
            // Counter wrapped past 100 inside the window. A second wrap
            // within one hour is not representable.
            hourly_rain += RAIN_COUNTER_ROLLOVER;
        }

        // Gust is evaluated before this tick's speed enters the window.
        let wind_gust = self.wind_window.max().unwrap_or(0.0);
        self.wind_window.rotate(wind_speed);

        debug!(date_time, hourly_rain, wind_gust, "closed tick window");

        Snapshot {
            date_time,
            conditions: self.conditions.clone(),
            hourly_rain,
            wind_gust,
        }
    }

    /// Number of ticks each window spans
    pub fn window_len(&self) -> usize {
        self.rain_window.capacity()
    }

    fn numeric(&self, name: &str) -> f64 {
        self.conditions
            .get(name)
            .and_then(FieldValue::as_f64)
            .unwrap_or(0.0)
    }
}

/// Aggregator handle shared by the collector and scheduler tasks.
///
/// All mutation goes through these methods; the lock is held only for the
/// in-memory work, never across I/O.
#[derive(Clone)]
pub struct SharedAggregator {
    inner: Arc<Mutex<RollingAggregator>>,
}

impl SharedAggregator {
    pub fn new(window_len: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RollingAggregator::new(window_len))),
        }
    }

    /// Apply every field of one parsed line under a single lock
    /// acquisition, so a concurrent tick never observes half a line.
    pub fn apply_line(&self, line_fields: &[(String, String)]) {
        let mut aggregator = self.inner.lock().expect("aggregator lock poisoned");
        for (name, value) in line_fields {
            aggregator.apply_sample(name, value);
        }
        debug!(fields = line_fields.len(), "applied sample line");
    }

    pub fn tick(&self, date_time: Timestamp) -> Snapshot {
        self.inner
            .lock()
            .expect("aggregator lock poisoned")
            .tick(date_time)
    }
}
