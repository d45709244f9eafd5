//! Core configuration type for a sweep

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::sweep::FailurePolicy;

/// Everything a sweep needs to know before it starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// First identifier visited (inclusive)
    pub(crate) id_start: u64,
    /// End of the identifier range (exclusive)
    pub(crate) id_end: u64,
    /// CSV file receiving `org_id,email` rows; truncated at start
    pub(crate) output_path: PathBuf,
    /// Scheme and host of the detail pages, without trailing slash
    pub(crate) base_url: String,
    /// Visible text of the optional expand control
    pub(crate) expand_label: String,
    pub(crate) expand_timeout_ms: u64,
    pub(crate) expand_settle_ms: u64,

    /// Timeout in seconds for `page.goto()`
    ///
    /// Also used as the CDP request timeout of the browser.
    pub(crate) page_load_timeout_secs: u64,

    /// Timeout in seconds for `page.wait_for_navigation()` and text capture
    pub(crate) navigation_timeout_secs: u64,

    pub(crate) headless: bool,
    /// Browser profile directory; a per-process temp dir when unset
    pub(crate) chrome_data_dir: Option<PathBuf>,
    pub(crate) failure_policy: FailurePolicy,

    /// Replacement for the built-in email pattern, compiled once
    #[serde(with = "optional_regex", default)]
    pub(crate) address_pattern: Option<Regex>,

    /// Upper bound on records started per second; unpaced when unset
    pub(crate) crawl_rate_rps: Option<f64>,
}

/// Stores a compiled pattern as its source text and recompiles it on load
mod optional_regex {
    use regex::Regex;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(pattern: &Option<Regex>, s: S) -> Result<S::Ok, S::Error> {
        match pattern {
            Some(re) => s.serialize_some(re.as_str()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Regex>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|p| {
                Regex::new(&p).map_err(|e| {
                    serde::de::Error::custom(format!("invalid address pattern '{p}': {e}"))
                })
            })
            .transpose()
    }
}
