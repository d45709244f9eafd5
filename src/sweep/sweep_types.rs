//! Core types for a sweep: errors, the failure policy and the run summary.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;

/// Convenience alias for Result with `SweepError`
pub type SweepResult<T> = Result<T, SweepError>;

/// Errors surfaced by the fetcher, the sink and the sweep loop
#[derive(Debug, Error)]
pub enum SweepError {
    /// Configuration rejected by the builder
    #[error("Configuration error: {0}")]
    Config(String),

    /// Browser could not be located, launched or driven
    #[error("Browser error: {0}")]
    Browser(String),

    /// A record page could not be loaded
    #[error("Navigation to {url} failed for record {id}: {message}")]
    Navigation {
        id: u64,
        url: String,
        message: String,
    },

    /// The rendered text of a loaded record could not be read
    #[error("Failed to capture text of record {id}: {message}")]
    Capture { id: u64, message: String },

    /// Output file could not be created or written
    #[error("Output sink error: {0}")]
    Sink(String),

    /// The sweep stopped on the first failing record
    #[error("Sweep aborted at record {id}: {source}")]
    Aborted {
        id: u64,
        #[source]
        source: Box<SweepError>,
    },

    /// Other errors
    #[error("Sweep error: {0}")]
    Other(String),
}

impl SweepError {
    /// Identifier of the record this error belongs to, if any
    #[must_use]
    pub fn record_id(&self) -> Option<u64> {
        match self {
            Self::Navigation { id, .. } | Self::Capture { id, .. } | Self::Aborted { id, .. } => {
                Some(*id)
            }
            _ => None,
        }
    }
}

impl From<anyhow::Error> for SweepError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain
        Self::Other(format!("{err:#}"))
    }
}

impl From<csv::Error> for SweepError {
    fn from(err: csv::Error) -> Self {
        Self::Sink(err.to_string())
    }
}

impl From<std::io::Error> for SweepError {
    fn from(err: std::io::Error) -> Self {
        Self::Sink(err.to_string())
    }
}

/// What the sweep does when a record cannot be fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure, remember the identifier and move on
    #[default]
    Skip,
    /// Stop the whole sweep at the first failing record
    Abort,
}

/// Totals for one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub range_start: u64,
    pub range_end: u64,
    /// Records for which a fetch was started
    pub attempted: u64,
    /// Records fetched and extracted without error
    pub succeeded: u64,
    /// Records skipped under `FailurePolicy::Skip`, in ascending order
    pub failed_ids: Vec<u64>,
    /// Records whose expand control was clicked
    pub expanded: u64,
    /// Data rows appended to the sink
    pub rows_written: u64,
    pub elapsed_ms: u64,
}

impl SweepSummary {
    #[must_use]
    pub fn new(ids: &Range<u64>) -> Self {
        Self {
            range_start: ids.start,
            range_end: ids.end,
            ..Self::default()
        }
    }

    /// Number of identifiers in the configured range
    #[must_use]
    pub fn range_len(&self) -> u64 {
        self.range_end.saturating_sub(self.range_start)
    }
}
