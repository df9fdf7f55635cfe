//! Core data types for the AcuDuino station bridge
//!
//! This crate provides the sample-line parser, the field value model shared
//! by the aggregation engine and the sinks, and the snapshot sink trait.

pub mod parser;
pub mod pipeline;
pub mod types;

pub use parser::*;
pub use pipeline::*;
pub use types::*;
