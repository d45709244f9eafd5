//! The extraction-and-sink loop
//!
//! Walks the identifier range in ascending order. Each record is fetched,
//! its addresses extracted and written, and the sink flushed before the next
//! record starts, so the output always reflects every finished record.

use std::ops::Range;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::pacer::Pacer;
use super::progress::ProgressReporter;
use super::sweep_types::{FailurePolicy, SweepError, SweepResult, SweepSummary};
use crate::config::SweepConfig;
use crate::extraction::AddressExtractor;
use crate::record_fetcher::RecordFetcher;
use crate::sink::{OutputRecord, RecordSink};

/// Loop settings that do not belong to the fetcher or the sink
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepOptions {
    pub failure_policy: FailurePolicy,
    pub crawl_rate_rps: Option<f64>,
}

impl From<&SweepConfig> for SweepOptions {
    fn from(config: &SweepConfig) -> Self {
        Self {
            failure_policy: config.failure_policy(),
            crawl_rate_rps: config.crawl_rate_rps(),
        }
    }
}

/// Visit every identifier in `ids` and write its addresses to `sink`
///
/// The sink is finished on every exit path. Under `FailurePolicy::Abort`
/// the first fetch failure ends the sweep with `SweepError::Aborted`; rows
/// of earlier records stay in the sink. Sink errors are always fatal.
pub async fn run_sweep<F, E, S, P>(
    ids: Range<u64>,
    fetcher: &mut F,
    extractor: &E,
    sink: &mut S,
    options: &SweepOptions,
    progress: &P,
) -> SweepResult<SweepSummary>
where
    F: RecordFetcher,
    E: AddressExtractor,
    S: RecordSink,
    P: ProgressReporter,
{
    let started = Instant::now();
    let mut summary = SweepSummary::new(&ids);

    info!(
        "Sweeping {} records [{}, {}) with failure policy {:?}",
        summary.range_len(),
        ids.start,
        ids.end,
        options.failure_policy
    );

    let outcome = drive(ids, fetcher, extractor, sink, options, progress, &mut summary).await;
    let finished = sink.finish();
    summary.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match (outcome, finished) {
        (Ok(()), Ok(())) => {
            if !summary.failed_ids.is_empty() {
                warn!(
                    "{} records failed and were skipped: {:?}",
                    summary.failed_ids.len(),
                    summary.failed_ids
                );
            }
            progress.report_completed(&summary);
            Ok(summary)
        }
        (Ok(()), Err(e)) => {
            error!("Failed to finish output: {e}");
            Err(e)
        }
        (Err(e), finished) => {
            if let Err(finish_err) = finished {
                error!("Failed to finish output after error: {finish_err}");
            }
            info!(
                "Stopped after {} records ({} succeeded, {} rows written)",
                summary.attempted, summary.succeeded, summary.rows_written
            );
            Err(e)
        }
    }
}

async fn drive<F, E, S, P>(
    ids: Range<u64>,
    fetcher: &mut F,
    extractor: &E,
    sink: &mut S,
    options: &SweepOptions,
    progress: &P,
    summary: &mut SweepSummary,
) -> SweepResult<()>
where
    F: RecordFetcher,
    E: AddressExtractor,
    S: RecordSink,
    P: ProgressReporter,
{
    let end = ids.end;
    let mut pacer = Pacer::new(options.crawl_rate_rps);

    for id in ids {
        pacer.wait_turn().await;
        summary.attempted += 1;
        progress.report_record_started(id, &fetcher.record_url(id));

        let page = match fetcher.fetch(id).await {
            Ok(page) => page,
            Err(e) => match options.failure_policy {
                FailurePolicy::Skip => {
                    warn!("Skipping record {id}: {e}");
                    progress.report_record_failed(id, &e);
                    summary.failed_ids.push(id);
                    continue;
                }
                FailurePolicy::Abort => {
                    error!("Record {id} failed: {e}");
                    progress.report_record_failed(id, &e);
                    let remaining = end - id - 1;
                    if remaining > 0 {
                        error!(
                            "Records [{}, {end}) were never attempted ({remaining} records)",
                            id + 1
                        );
                    }
                    return Err(SweepError::Aborted {
                        id,
                        source: Box::new(e),
                    });
                }
            },
        };

        if page.expand.interacted() {
            summary.expanded += 1;
        }

        let addresses = extractor.extract(&page.content);
        let count = addresses.len();
        for email in addresses {
            sink.append(&OutputRecord::new(id, email))?;
        }
        sink.flush()?;

        debug!("Record {id}: {count} addresses");
        summary.rows_written += count as u64;
        summary.succeeded += 1;
        progress.report_record_done(id, count);
    }

    Ok(())
}
