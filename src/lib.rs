pub mod browser_setup;
pub mod config;
pub mod extraction;
pub mod record_fetcher;
pub mod sink;
pub mod sweep;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::SweepConfig;
pub use extraction::{AddressExtractor, RegexAddressExtractor};
pub use record_fetcher::{
    ChromiumFetcher, ExpandOutcome, FetchedPage, PageContent, RecordFetcher, detail_url,
};
pub use sink::{CsvSink, OutputRecord, RecordSink};
pub use sweep::{
    FailurePolicy, LogProgress, NoOpProgress, ProgressReporter, SweepError, SweepOptions,
    SweepResult, SweepSummary, run_sweep,
};

/// Run a complete sweep as configured: open the CSV output, launch the
/// browser, visit every record and tear the browser down again.
pub async fn sweep<P: ProgressReporter>(config: SweepConfig, progress: &P) -> SweepResult<SweepSummary> {
    let extractor = match config.address_pattern() {
        Some(pattern) => RegexAddressExtractor::with_pattern(pattern.clone()),
        None => RegexAddressExtractor::new(),
    };

    let mut sink = CsvSink::create(config.output_path())?;

    let mut fetcher = match ChromiumFetcher::launch(&config).await {
        Ok(fetcher) => fetcher,
        Err(e) => {
            // Header is already on disk; make sure it is flushed
            crate::sink::finish_after_error(&mut sink);
            return Err(e);
        }
    };
    progress.report_browser_launched();

    let result = run_sweep(
        config.id_range(),
        &mut fetcher,
        &extractor,
        &mut sink,
        &SweepOptions::from(&config),
        progress,
    )
    .await;

    fetcher.shutdown().await;
    result
}
