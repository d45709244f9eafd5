//! Sweep Module
//!
//! Drives a record fetcher across an identifier range, extracting addresses
//! from each page and appending them to an output sink.

pub mod orchestrator;
pub mod pacer;
pub mod progress;
pub mod sweep_types;

pub use orchestrator::{SweepOptions, run_sweep};
pub use progress::{LogProgress, NoOpProgress, ProgressReporter};
pub use sweep_types::{FailurePolicy, SweepError, SweepResult, SweepSummary};
