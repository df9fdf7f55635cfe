//! Rolling-window aggregation engine
//!
//! Accumulates instantaneous station samples and derives rolling
//! one-hour metrics (rainfall accumulation, peak wind gust) on a
//! fixed tick cadence.

pub mod aggregator;
pub mod window;

pub use aggregator::*;
pub use window::*;
