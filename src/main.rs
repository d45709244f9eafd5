// Sweep organisation detail pages and collect contact emails into a CSV file.
//
// One headless Chromium tab visits every identifier in turn; see `--help`
// for the knobs.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fpo_contact_scrape::utils::{
    DEFAULT_BASE_URL, DEFAULT_EXPAND_LABEL, DEFAULT_EXPAND_SETTLE_MS, DEFAULT_EXPAND_TIMEOUT_MS,
    DEFAULT_ID_END, DEFAULT_ID_START, DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_OUTPUT_PATH,
    DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
};
use fpo_contact_scrape::{FailurePolicy, LogProgress, SweepConfig};

#[derive(Debug, Parser)]
#[command(version, about = "Extract contact emails from organisation detail pages")]
struct Cli {
    /// First identifier to visit (inclusive)
    #[arg(long, default_value_t = DEFAULT_ID_START)]
    start: u64,

    /// Identifier to stop before (exclusive)
    #[arg(long, default_value_t = DEFAULT_ID_END)]
    end: u64,

    /// CSV file to write; truncated if it exists
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Scheme and host serving the detail pages
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Text of the control that expands hidden details
    #[arg(long, default_value = DEFAULT_EXPAND_LABEL)]
    expand_label: String,

    #[arg(long, default_value_t = DEFAULT_EXPAND_TIMEOUT_MS)]
    expand_timeout_ms: u64,

    #[arg(long, default_value_t = DEFAULT_EXPAND_SETTLE_MS)]
    expand_settle_ms: u64,

    #[arg(long, default_value_t = DEFAULT_PAGE_LOAD_TIMEOUT_SECS)]
    page_load_timeout_secs: u64,

    #[arg(long, default_value_t = DEFAULT_NAVIGATION_TIMEOUT_SECS)]
    navigation_timeout_secs: u64,

    /// What to do when a record page cannot be loaded
    #[arg(long, value_enum, default_value_t = FailurePolicy::Skip)]
    on_failure: FailurePolicy,

    /// Maximum records started per second
    #[arg(long)]
    rate: Option<f64>,

    /// Regex replacing the built-in email pattern
    #[arg(long)]
    pattern: Option<String>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Browser profile directory (defaults to a temp dir)
    #[arg(long)]
    chrome_data_dir: Option<PathBuf>,

    /// Log a progress line every N records
    #[arg(long, default_value_t = 100)]
    progress_every: u64,
}

impl Cli {
    fn into_config(self) -> Result<SweepConfig> {
        SweepConfig::builder()
            .id_range(self.start..self.end)
            .output_path(self.output)
            .base_url(self.base_url)
            .expand_label(self.expand_label)
            .expand_timeout_ms(self.expand_timeout_ms)
            .expand_settle_ms(self.expand_settle_ms)
            .page_load_timeout_secs(self.page_load_timeout_secs)
            .navigation_timeout_secs(self.navigation_timeout_secs)
            .failure_policy(self.on_failure)
            .crawl_rate_rps(self.rate)
            .address_pattern(self.pattern)
            .headless(!self.headed)
            .chrome_data_dir(self.chrome_data_dir)
            .build()
            .context("Invalid configuration")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let progress_every = cli.progress_every;
    let config = cli.into_config()?;

    let total = config.id_range().end.saturating_sub(config.id_range().start);
    let progress = LogProgress::new(progress_every, total);

    let summary = fpo_contact_scrape::sweep(config, &progress)
        .await
        .context("Sweep failed")?;

    info!(
        "Summary: {}",
        serde_json::to_string(&summary).context("Failed to serialize summary")?
    );
    Ok(())
}
