//! Output sinks for extracted records
//!
//! The sweep appends `(org_id, email)` rows through [`RecordSink`]; the
//! production sink is a CSV file.

pub mod csv_sink;

pub use csv_sink::CsvSink;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::sweep::{SweepError, SweepResult};

/// One output row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub org_id: u64,
    pub email: String,
}

impl OutputRecord {
    #[must_use]
    pub fn new(org_id: u64, email: impl Into<String>) -> Self {
        Self {
            org_id,
            email: email.into(),
        }
    }
}

/// Append-only destination for output rows
///
/// Sinks write their header when created. Rows are never rewritten.
pub trait RecordSink {
    /// Append one row
    fn append(&mut self, record: &OutputRecord) -> SweepResult<()>;

    /// Make every appended row durable
    fn flush(&mut self) -> SweepResult<()>;

    /// Final flush at the end of a sweep, on success and on abort
    fn finish(&mut self) -> SweepResult<()> {
        self.flush()
    }
}

/// Finish `sink` on a path that is already failing
///
/// The earlier error is the one the caller reports, so a finish failure is
/// logged and handed back only for inspection.
pub fn finish_after_error<S: RecordSink>(sink: &mut S) -> Option<SweepError> {
    match sink.finish() {
        Ok(()) => None,
        Err(e) => {
            warn!("Failed to finish output after error: {e}");
            Some(e)
        }
    }
}
