//! CSV output sink

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use super::{OutputRecord, RecordSink};
use crate::sweep::{SweepError, SweepResult};
use crate::utils::CSV_HEADER;

/// Writes `org_id,email` rows to any `Write`
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl CsvSink<File> {
    /// Create (or truncate) `path` and write the header row
    pub fn create(path: &Path) -> SweepResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                SweepError::Sink(format!(
                    "Failed to create output directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let file = File::create(path).map_err(|e| {
            SweepError::Sink(format!("Failed to create {}: {e}", path.display()))
        })?;
        info!("Writing records to {}", path.display());
        Self::from_writer(file)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap `inner` and write the header row
    pub fn from_writer(inner: W) -> SweepResult<Self> {
        // Header is written by hand so a sweep with no matches still has one
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Data rows appended so far
    #[must_use]
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> SweepResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| SweepError::Sink(format!("Failed to flush CSV writer: {e}")))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn append(&mut self, record: &OutputRecord) -> SweepResult<()> {
        self.writer.serialize(record)?;
        self.rows += 1;
        Ok(())
    }

    fn flush(&mut self) -> SweepResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> SweepResult<()> {
        self.writer.flush()?;
        debug!("CSV sink finished after {} rows", self.rows);
        Ok(())
    }
}
