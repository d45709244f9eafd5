//! Type-safe builder for `SweepConfig` using the typestate pattern
//!
//! The identifier range and the output path are required and must be given
//! in that order; everything else has a default from `utils::constants`.

use regex::Regex;
use std::marker::PhantomData;
use std::ops::Range;
use std::path::PathBuf;
use url::Url;

use super::types::SweepConfig;
use crate::sweep::{FailurePolicy, SweepError, SweepResult};
use crate::utils::{
    DEFAULT_BASE_URL, DEFAULT_EXPAND_LABEL, DEFAULT_EXPAND_SETTLE_MS, DEFAULT_EXPAND_TIMEOUT_MS,
    DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
};

// Type states for the builder
pub struct WithIdRange;
pub struct WithOutputPath;

pub struct SweepConfigBuilder<State = ()> {
    pub(crate) id_range: Option<Range<u64>>,
    pub(crate) output_path: Option<PathBuf>,
    pub(crate) base_url: String,
    pub(crate) expand_label: String,
    pub(crate) expand_timeout_ms: u64,
    pub(crate) expand_settle_ms: u64,
    pub(crate) page_load_timeout_secs: u64,
    pub(crate) navigation_timeout_secs: u64,
    pub(crate) headless: bool,
    pub(crate) chrome_data_dir: Option<PathBuf>,
    pub(crate) failure_policy: FailurePolicy,
    pub(crate) address_pattern: Option<String>,
    pub(crate) crawl_rate_rps: Option<f64>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for SweepConfigBuilder<()> {
    fn default() -> Self {
        Self {
            id_range: None,
            output_path: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            expand_label: DEFAULT_EXPAND_LABEL.to_string(),
            expand_timeout_ms: DEFAULT_EXPAND_TIMEOUT_MS,
            expand_settle_ms: DEFAULT_EXPAND_SETTLE_MS,
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            headless: true,
            chrome_data_dir: None,
            failure_policy: FailurePolicy::default(),
            address_pattern: None,
            crawl_rate_rps: None,
            _phantom: PhantomData,
        }
    }
}

impl SweepConfig {
    /// Create a builder for configuring a `SweepConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> SweepConfigBuilder<()> {
        SweepConfigBuilder::default()
    }
}

impl<State> SweepConfigBuilder<State> {
    fn into_state<Next>(self) -> SweepConfigBuilder<Next> {
        SweepConfigBuilder {
            id_range: self.id_range,
            output_path: self.output_path,
            base_url: self.base_url,
            expand_label: self.expand_label,
            expand_timeout_ms: self.expand_timeout_ms,
            expand_settle_ms: self.expand_settle_ms,
            page_load_timeout_secs: self.page_load_timeout_secs,
            navigation_timeout_secs: self.navigation_timeout_secs,
            headless: self.headless,
            chrome_data_dir: self.chrome_data_dir,
            failure_policy: self.failure_policy,
            address_pattern: self.address_pattern,
            crawl_rate_rps: self.crawl_rate_rps,
            _phantom: PhantomData,
        }
    }
}

impl SweepConfigBuilder<()> {
    /// Identifiers to visit: `start` inclusive, `end` exclusive
    pub fn id_range(mut self, ids: Range<u64>) -> SweepConfigBuilder<WithIdRange> {
        self.id_range = Some(ids);
        self.into_state()
    }
}

impl SweepConfigBuilder<WithIdRange> {
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> SweepConfigBuilder<WithOutputPath> {
        self.output_path = Some(path.into());
        self.into_state()
    }
}

// Build method only available when all required fields are set
impl SweepConfigBuilder<WithOutputPath> {
    pub fn build(self) -> SweepResult<SweepConfig> {
        let ids = self
            .id_range
            .ok_or_else(|| SweepError::Config("id_range is required".into()))?;
        if ids.start > ids.end {
            return Err(SweepError::Config(format!(
                "id range start {} is after end {}",
                ids.start, ids.end
            )));
        }

        let output_path = self
            .output_path
            .ok_or_else(|| SweepError::Config("output_path is required".into()))?;
        if output_path.as_os_str().is_empty() {
            return Err(SweepError::Config("output_path must not be empty".into()));
        }

        let base_url = normalize_base_url(&self.base_url)?;

        let expand_label = self.expand_label.trim().to_string();
        if expand_label.is_empty() {
            return Err(SweepError::Config("expand_label must not be empty".into()));
        }

        if self.page_load_timeout_secs == 0 || self.navigation_timeout_secs == 0 {
            return Err(SweepError::Config(
                "page timeouts must be at least one second".into(),
            ));
        }

        // Compile once so a bad pattern fails before the browser starts
        let address_pattern = self
            .address_pattern
            .as_deref()
            .map(|p| {
                Regex::new(p)
                    .map_err(|e| SweepError::Config(format!("Invalid address pattern '{p}': {e}")))
            })
            .transpose()?;

        let crawl_rate_rps = match self.crawl_rate_rps {
            Some(rate) if !(rate.is_finite() && rate > 0.0) => {
                return Err(SweepError::Config(format!(
                    "crawl_rate_rps must be a positive number, got {rate}"
                )));
            }
            other => other,
        };

        Ok(SweepConfig {
            id_start: ids.start,
            id_end: ids.end,
            output_path,
            base_url,
            expand_label,
            expand_timeout_ms: self.expand_timeout_ms,
            expand_settle_ms: self.expand_settle_ms,
            page_load_timeout_secs: self.page_load_timeout_secs,
            navigation_timeout_secs: self.navigation_timeout_secs,
            headless: self.headless,
            chrome_data_dir: self.chrome_data_dir,
            failure_policy: self.failure_policy,
            address_pattern,
            crawl_rate_rps,
        })
    }
}

/// Accept `host`, `http(s)://host` or `http(s)://host/`; reject anything with
/// a path, query or non-HTTP scheme
fn normalize_base_url(raw: &str) -> SweepResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&with_scheme)
        .map_err(|e| SweepError::Config(format!("Invalid base URL '{raw}': {e}")))?;
    if parsed.host_str().is_none() {
        return Err(SweepError::Config(format!("Base URL '{raw}' has no host")));
    }
    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(SweepError::Config(format!(
            "Base URL '{raw}' must not carry a path, query or fragment"
        )));
    }
    Ok(with_scheme)
}

// Builder methods available at any state
impl<State> SweepConfigBuilder<State> {
    /// Scheme and host serving the detail pages
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Visible text of the optional expand control
    #[must_use]
    pub fn expand_label(mut self, label: impl Into<String>) -> Self {
        self.expand_label = label.into();
        self
    }

    /// How long to look for the expand control; 0 means a single attempt
    #[must_use]
    pub fn expand_timeout_ms(mut self, ms: u64) -> Self {
        self.expand_timeout_ms = ms;
        self
    }

    /// Pause after a successful expand click
    #[must_use]
    pub fn expand_settle_ms(mut self, ms: u64) -> Self {
        self.expand_settle_ms = ms;
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.page_load_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.navigation_timeout_secs = secs;
        self
    }

    /// Set browser headless mode (default: true)
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.chrome_data_dir = dir;
        self
    }

    /// Skip failing records (default) or stop at the first one
    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Replace the built-in email pattern; validated by `build()`
    #[must_use]
    pub fn address_pattern(mut self, pattern: Option<String>) -> Self {
        self.address_pattern = pattern;
        self
    }

    /// Cap on records started per second
    #[must_use]
    pub fn crawl_rate_rps(mut self, rate: Option<f64>) -> Self {
        self.crawl_rate_rps = rate;
        self
    }
}
