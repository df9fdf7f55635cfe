//! Snapshot destinations
//!
//! The persist sink appends to the local SQLite history file; the report
//! sink uploads to the Weather Underground PWS endpoint. The publisher
//! drives both once per tick.

pub mod publisher;
pub mod sqlite;
pub mod wunderground;

pub use publisher::*;
pub use sqlite::*;
pub use wunderground::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Missing station credentials")]
    MissingCredentials,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote rejected update: {status} {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Outcome of one publish cycle when anything went wrong.
///
/// The two destinations are independent, so a failed persist never hides
/// the report outcome and vice versa.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Persist failed: {0}")]
    Persist(anyhow::Error),

    #[error("Report failed: {0}")]
    Report(anyhow::Error),

    #[error("Persist failed: {persist}; report failed: {report}")]
    Both {
        persist: anyhow::Error,
        report: anyhow::Error,
    },
}
