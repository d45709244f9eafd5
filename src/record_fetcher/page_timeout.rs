//! Timeout wrapper for page operations
//!
//! Navigation has no upper bound of its own; every browser round trip made
//! while fetching a record goes through [`with_page_timeout`] so a hung page
//! fails that record instead of stalling the sweep.

use anyhow::{Result, anyhow};
use std::future::Future;
use std::time::Duration;

/// Run `operation`, failing with `"<operation_name> timed out after <n>s"`
/// once `limit` elapses
pub async fn with_page_timeout<F, T>(operation: F, limit: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .unwrap_or_else(|_| {
            Err(anyhow!(
                "{operation_name} timed out after {}s",
                limit.as_secs_f64()
            ))
        })
}
