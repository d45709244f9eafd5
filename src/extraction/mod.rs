//! Address extraction from captured page text
//!
//! Extraction is a strategy behind [`AddressExtractor`] so the sweep loop
//! does not care whether addresses come from a regex over rendered text or
//! from something more structured.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::record_fetcher::PageContent;
use crate::utils::EMAIL_PATTERN;

static DEFAULT_EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"));

/// Turns the text of one page into its set of addresses
pub trait AddressExtractor {
    /// Addresses found in `content`, each at most once.
    ///
    /// Must be a pure function of `content`.
    fn extract(&self, content: &PageContent) -> Vec<String>;
}

/// Syntactic email matcher over rendered text
///
/// Returns matches in order of first appearance with later duplicates dropped.
#[derive(Debug, Clone)]
pub struct RegexAddressExtractor {
    pattern: Regex,
}

impl RegexAddressExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: DEFAULT_EMAIL_REGEX.clone(),
        }
    }

    /// Use a caller supplied pattern; every whole match is an address
    #[must_use]
    pub fn with_pattern(pattern: Regex) -> Self {
        Self { pattern }
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for RegexAddressExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressExtractor for RegexAddressExtractor {
    fn extract(&self, content: &PageContent) -> Vec<String> {
        let mut seen = HashSet::new();
        self.pattern
            .find_iter(content.as_str())
            .map(|m| m.as_str())
            .filter(|addr| seen.insert(*addr))
            .map(str::to_string)
            .collect()
    }
}
