//! Progress reporting abstraction for sweeps
//!
//! Defines the `ProgressReporter` trait for per-record lifecycle events and
//! provides a no-op implementation plus a periodic log reporter.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use super::sweep_types::{SweepError, SweepSummary};

/// Trait for reporting sweep progress at key lifecycle events
pub trait ProgressReporter: Send + Sync {
    /// Report that the browser session is ready
    fn report_browser_launched(&self);

    /// Report that a record is about to be fetched
    fn report_record_started(&self, id: u64, url: &str);

    /// Report that a record was fetched and its addresses written
    fn report_record_done(&self, id: u64, addresses: usize);

    /// Report that a record could not be fetched
    fn report_record_failed(&self, id: u64, error: &SweepError);

    /// Report that the sweep has reached the end of its range
    fn report_completed(&self, summary: &SweepSummary);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_browser_launched(&self) {}

    #[inline(always)]
    fn report_record_started(&self, _id: u64, _url: &str) {}

    #[inline(always)]
    fn report_record_done(&self, _id: u64, _addresses: usize) {}

    #[inline(always)]
    fn report_record_failed(&self, _id: u64, _error: &SweepError) {}

    #[inline(always)]
    fn report_completed(&self, _summary: &SweepSummary) {}
}

/// Logs a running tally every `every` records
#[derive(Debug)]
pub struct LogProgress {
    every: u64,
    total: u64,
    seen: AtomicU64,
    addresses: AtomicU64,
    failures: AtomicU64,
}

impl LogProgress {
    /// `total` is the size of the identifier range; `every` of 0 is treated as 1
    #[must_use]
    pub fn new(every: u64, total: u64) -> Self {
        Self {
            every: every.max(1),
            total,
            seen: AtomicU64::new(0),
            addresses: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    fn tick(&self, id: u64) {
        let seen = self.seen.fetch_add(1, Ordering::Relaxed) + 1;
        if seen % self.every == 0 || seen == self.total {
            info!(
                "Progress: {seen}/{} records (last id {id}), {} addresses, {} failures",
                self.total,
                self.addresses.load(Ordering::Relaxed),
                self.failures.load(Ordering::Relaxed),
            );
        }
    }
}

impl ProgressReporter for LogProgress {
    fn report_browser_launched(&self) {
        info!("Browser session ready");
    }

    fn report_record_started(&self, _id: u64, _url: &str) {}

    fn report_record_done(&self, id: u64, addresses: usize) {
        self.addresses.fetch_add(addresses as u64, Ordering::Relaxed);
        self.tick(id);
    }

    fn report_record_failed(&self, id: u64, _error: &SweepError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.tick(id);
    }

    fn report_completed(&self, summary: &SweepSummary) {
        info!(
            "Sweep finished: {} of {} records succeeded, {} rows written in {}ms",
            summary.succeeded,
            summary.range_len(),
            summary.rows_written,
            summary.elapsed_ms
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_counts_addresses_and_failures() {
        let progress = LogProgress::new(2, 4);
        progress.report_record_done(1, 3);
        progress.report_record_failed(2, &SweepError::Other("reset".into()));
        progress.report_record_done(3, 0);

        assert_eq!(progress.seen.load(Ordering::Relaxed), 3);
        assert_eq!(progress.addresses.load(Ordering::Relaxed), 3);
        assert_eq!(progress.failures.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let progress = LogProgress::new(0, 10);
        assert_eq!(progress.every, 1);
    }
}
