//! Best-effort "expand" interaction
//!
//! Some record pages hide part of their details behind a control labelled
//! "View More". The control is looked up by its visible text and clicked if
//! it shows up within a short wait. Nothing in here can fail a fetch: the
//! caller only learns which of the three outcomes happened.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Outcome of the optional expand step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpandOutcome {
    /// The control was clicked
    Interacted,
    /// The control never appeared within the wait
    NotFound,
    /// The control appeared (or the lookup stalled) but no click completed
    /// within the wait
    TimedOut,
}

impl ExpandOutcome {
    #[must_use]
    pub fn interacted(self) -> bool {
        matches!(self, Self::Interacted)
    }
}

/// Result of one lookup-and-click attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandAttempt {
    /// No element carries the label yet
    Missing,
    /// Element found and clicked
    Clicked,
    /// Element found but the click was rejected
    ClickFailed(String),
}

/// Repeat `attempt` every `interval` until it clicks or `wait` runs out
///
/// An attempt still running at the deadline is abandoned and counts as a
/// timeout. One attempt is always made, even with a zero `wait`.
pub async fn poll_expand<F, Fut>(mut attempt: F, wait: Duration, interval: Duration) -> ExpandOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ExpandAttempt>,
{
    let deadline = Instant::now() + wait;
    let mut seen = false;

    loop {
        match tokio::time::timeout_at(deadline, attempt()).await {
            Ok(ExpandAttempt::Clicked) => return ExpandOutcome::Interacted,
            Ok(ExpandAttempt::Missing) => {}
            Ok(ExpandAttempt::ClickFailed(reason)) => {
                trace!("Expand control present but click failed: {reason}");
                seen = true;
            }
            Err(_) => return ExpandOutcome::TimedOut,
        }

        let now = Instant::now();
        if now >= deadline {
            break;
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }

    if seen {
        ExpandOutcome::TimedOut
    } else {
        ExpandOutcome::NotFound
    }
}

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// XPath matching body elements that own a text node containing `label`
///
/// Every text child is checked, not only the first, so an icon in front of
/// the label does not hide it. The match ignores ASCII case. Script, style
/// and template contents are never candidates.
#[must_use]
pub fn label_xpath(label: &str) -> String {
    format!(
        "//body//*[not(self::script or self::style or self::noscript or self::template)]\
         [text()[contains(translate(normalize-space(.), '{UPPER}', '{LOWER}'), {})]]",
        xpath_literal(&label.trim().to_ascii_lowercase())
    )
}

/// Quote `value` as an XPath 1.0 string literal
///
/// XPath 1.0 has no escape sequences, so a value holding both quote kinds is
/// spliced together with `concat()`.
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }

    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}
