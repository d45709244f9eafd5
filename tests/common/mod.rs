//! Test doubles for the sweep loop: a scripted fetcher and an in-memory sink

use fpo_contact_scrape::{
    ExpandOutcome, FetchedPage, OutputRecord, RecordFetcher, RecordSink, SweepError, SweepResult,
    detail_url,
};
use std::collections::HashMap;

pub const TEST_BASE_URL: &str = "http://fpo.test";

/// What the scripted fetcher returns for one identifier
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Scripted {
    Page(String, ExpandOutcome),
    NavigationFailure(String),
}

/// Fetcher replaying canned pages; unscripted ids render an empty page
/// without an expand control
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    pages: HashMap<u64, Scripted>,
    pub visited: Vec<u64>,
}

#[allow(dead_code)]
impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, id: u64, text: &str) -> Self {
        self.pages
            .insert(id, Scripted::Page(text.to_string(), ExpandOutcome::NotFound));
        self
    }

    pub fn expanded_page(mut self, id: u64, text: &str) -> Self {
        self.pages
            .insert(id, Scripted::Page(text.to_string(), ExpandOutcome::Interacted));
        self
    }

    pub fn failing(mut self, id: u64, message: &str) -> Self {
        self.pages
            .insert(id, Scripted::NavigationFailure(message.to_string()));
        self
    }
}

impl RecordFetcher for ScriptedFetcher {
    fn record_url(&self, id: u64) -> String {
        detail_url(TEST_BASE_URL, id)
    }

    async fn fetch(&mut self, id: u64) -> SweepResult<FetchedPage> {
        self.visited.push(id);
        match self.pages.get(&id) {
            Some(Scripted::Page(text, expand)) => Ok(FetchedPage::new(text.as_str(), *expand)),
            Some(Scripted::NavigationFailure(message)) => Err(SweepError::Navigation {
                id,
                url: self.record_url(id),
                message: message.clone(),
            }),
            None => Ok(FetchedPage::new("", ExpandOutcome::NotFound)),
        }
    }
}

/// Sink keeping rows in memory and counting lifecycle calls
#[derive(Debug, Default)]
pub struct MemorySink {
    pub rows: Vec<OutputRecord>,
    pub flushes: usize,
    pub finished: usize,
    /// Fail the append of this row number (0-based)
    pub fail_on_row: Option<usize>,
}

#[allow(dead_code)]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on_row(row: usize) -> Self {
        Self {
            fail_on_row: Some(row),
            ..Self::default()
        }
    }

    pub fn pairs(&self) -> Vec<(u64, &str)> {
        self.rows
            .iter()
            .map(|r| (r.org_id, r.email.as_str()))
            .collect()
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &OutputRecord) -> SweepResult<()> {
        if self.fail_on_row == Some(self.rows.len()) {
            return Err(SweepError::Sink("disk full".to_string()));
        }
        self.rows.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> SweepResult<()> {
        self.flushes += 1;
        Ok(())
    }

    fn finish(&mut self) -> SweepResult<()> {
        self.finished += 1;
        Ok(())
    }
}
