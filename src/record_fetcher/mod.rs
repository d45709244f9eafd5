//! Record fetching
//!
//! A [`RecordFetcher`] turns one record identifier into the rendered text of
//! its detail page. The production fetcher drives a single headless Chromium
//! tab for the whole sweep; tests substitute their own implementation.

pub mod chromium;
pub mod cleanup;
pub mod expand;
pub mod page_timeout;

pub use chromium::ChromiumFetcher;
pub use expand::ExpandOutcome;

use std::fmt;
use std::future::Future;

use crate::sweep::SweepResult;
use crate::utils::DETAIL_PATH;

/// Visible text of one rendered record page
///
/// Lives only as long as the record is being processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent(String);

impl PageContent {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for PageContent {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for PageContent {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for PageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of fetching one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub content: PageContent,
    /// What happened to the optional expand step
    pub expand: ExpandOutcome,
}

impl FetchedPage {
    #[must_use]
    pub fn new(content: impl Into<PageContent>, expand: ExpandOutcome) -> Self {
        Self {
            content: content.into(),
            expand,
        }
    }
}

/// Produces the rendered text of a record page by identifier
///
/// Implementations are driven strictly sequentially: the next `fetch` starts
/// only after the previous one has resolved. A fetch either yields the page
/// or a navigation/capture error; the expand step never fails a fetch.
pub trait RecordFetcher {
    /// Canonical URL of the record page
    fn record_url(&self, id: u64) -> String;

    fn fetch(&mut self, id: u64) -> impl Future<Output = SweepResult<FetchedPage>>;
}

/// `<base_url>/main/organisationDetails/<id>`
#[must_use]
pub fn detail_url(base_url: &str, id: u64) -> String {
    format!("{}{DETAIL_PATH}{id}", base_url.trim_end_matches('/'))
}
