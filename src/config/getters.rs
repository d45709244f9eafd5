//! Getter methods for `SweepConfig`

use regex::Regex;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::SweepConfig;
use crate::record_fetcher::detail_url;
use crate::sweep::FailurePolicy;

impl SweepConfig {
    #[must_use]
    pub fn id_range(&self) -> Range<u64> {
        self.id_start..self.id_end
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Detail page address of record `id`
    #[must_use]
    pub fn record_url(&self, id: u64) -> String {
        detail_url(&self.base_url, id)
    }

    #[must_use]
    pub fn expand_label(&self) -> &str {
        &self.expand_label
    }

    #[must_use]
    pub fn expand_timeout(&self) -> Duration {
        Duration::from_millis(self.expand_timeout_ms)
    }

    #[must_use]
    pub fn expand_settle(&self) -> Duration {
        Duration::from_millis(self.expand_settle_ms)
    }

    #[must_use]
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }

    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Custom email pattern, compiled
    #[must_use]
    pub fn address_pattern(&self) -> Option<&Regex> {
        self.address_pattern.as_ref()
    }

    #[must_use]
    pub fn crawl_rate_rps(&self) -> Option<f64> {
        self.crawl_rate_rps
    }
}
