//! Record fetcher backed by one long-lived headless Chromium tab

use anyhow::anyhow;
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::cleanup::{CleanupResult, close_browser_session};
use super::expand::{ExpandAttempt, ExpandOutcome, label_xpath, poll_expand};
use super::page_timeout::with_page_timeout;
use super::{FetchedPage, PageContent, RecordFetcher, detail_url};
use crate::browser_setup::{default_user_data_dir, launch_browser};
use crate::config::SweepConfig;
use crate::sweep::{SweepError, SweepResult};
use crate::utils::EXPAND_POLL_INTERVAL_MS;

/// Browser session shared by every fetch of a sweep
///
/// Acquire with [`ChromiumFetcher::launch`] and release with
/// [`ChromiumFetcher::shutdown`].
pub struct ChromiumFetcher {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
    user_data_dir: PathBuf,
    base_url: String,
    expand_xpath: String,
    expand_timeout: Duration,
    expand_settle: Duration,
    page_load_timeout: Duration,
    navigation_timeout: Duration,
}

impl ChromiumFetcher {
    /// Launch the browser and open the tab every record is loaded into
    pub async fn launch(config: &SweepConfig) -> SweepResult<Self> {
        let user_data_dir = config
            .chrome_data_dir()
            .cloned()
            .unwrap_or_else(default_user_data_dir);

        let (mut browser, handler_task) = launch_browser(
            config.headless(),
            &user_data_dir,
            config.page_load_timeout(),
        )
        .await
        .map_err(|e| SweepError::Browser(format!("{e:#}")))?;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // Nothing owns the browser yet; tear it down here
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                super::cleanup::remove_profile_dir(&user_data_dir);
                return Err(SweepError::Browser(format!("Failed to open tab: {e}")));
            }
        };

        Ok(Self {
            browser,
            handler_task,
            page,
            user_data_dir,
            base_url: config.base_url().to_string(),
            expand_xpath: label_xpath(config.expand_label()),
            expand_timeout: config.expand_timeout(),
            expand_settle: config.expand_settle(),
            page_load_timeout: config.page_load_timeout(),
            navigation_timeout: config.navigation_timeout(),
        })
    }

    /// Close the tab and browser, then stop the CDP handler
    ///
    /// Teardown problems are logged, never returned: by the time this runs
    /// the sweep result is already decided.
    pub async fn shutdown(self) {
        let Self {
            browser,
            handler_task,
            page,
            user_data_dir,
            ..
        } = self;

        if let Err(e) = page.close().await {
            debug!("Failed to close tab: {e}");
        }

        match close_browser_session(browser, &user_data_dir).await {
            CleanupResult::Success => debug!("Browser session closed"),
            CleanupResult::PartialFailure(errors) => {
                warn!("Browser cleanup completed with failures: {errors:?}");
            }
        }

        // Abort the handler only after the browser is gone
        handler_task.abort();
        if let Err(e) = handler_task.await
            && !e.is_cancelled()
        {
            warn!("Browser handler task failed during abort: {e}");
        }
    }

    async fn navigate(&self, id: u64, url: &str) -> SweepResult<()> {
        let page = &self.page;
        let navigation_error = |e: anyhow::Error| SweepError::Navigation {
            id,
            url: url.to_string(),
            message: format!("{e:#}"),
        };

        with_page_timeout(
            async { page.goto(url).await.map(|_| ()).map_err(|e| anyhow!("{e}")) },
            self.page_load_timeout,
            "Page navigation",
        )
        .await
        .map_err(navigation_error)?;

        with_page_timeout(
            async {
                page.wait_for_navigation()
                    .await
                    .map(|_| ())
                    .map_err(|e| anyhow!("{e}"))
            },
            self.navigation_timeout,
            "Page load",
        )
        .await
        .map_err(navigation_error)
    }

    async fn try_expand(&self, id: u64) -> ExpandOutcome {
        let page = &self.page;
        let xpath = self.expand_xpath.as_str();

        let outcome = poll_expand(
            || async move {
                match page.find_xpath(xpath).await {
                    Err(_) => ExpandAttempt::Missing,
                    Ok(element) => match element.click().await {
                        Ok(_) => ExpandAttempt::Clicked,
                        Err(e) => ExpandAttempt::ClickFailed(e.to_string()),
                    },
                }
            },
            self.expand_timeout,
            Duration::from_millis(EXPAND_POLL_INTERVAL_MS),
        )
        .await;

        match outcome {
            ExpandOutcome::Interacted => {
                debug!("Record {id}: expanded, waiting {:?}", self.expand_settle);
                tokio::time::sleep(self.expand_settle).await;
            }
            ExpandOutcome::NotFound => debug!("Record {id}: no expand control"),
            ExpandOutcome::TimedOut => debug!("Record {id}: expand control did not respond"),
        }
        outcome
    }

    async fn capture_text(&self, id: u64) -> SweepResult<PageContent> {
        let page = &self.page;
        let text = with_page_timeout(
            async {
                let body = page
                    .find_element("body")
                    .await
                    .map_err(|e| anyhow!("body not found: {e}"))?;
                let text = body.inner_text().await.map_err(|e| anyhow!("{e}"))?;
                anyhow::Ok(text)
            },
            self.navigation_timeout,
            "Text capture",
        )
        .await
        .map_err(|e| SweepError::Capture {
            id,
            message: format!("{e:#}"),
        })?;

        Ok(PageContent::from(text.unwrap_or_default()))
    }
}

impl RecordFetcher for ChromiumFetcher {
    fn record_url(&self, id: u64) -> String {
        detail_url(&self.base_url, id)
    }

    async fn fetch(&mut self, id: u64) -> SweepResult<FetchedPage> {
        let url = self.record_url(id);
        info!("Visiting {url}");

        self.navigate(id, &url).await?;
        let expand = self.try_expand(id).await;
        let content = self.capture_text(id).await?;

        debug!("Record {id}: captured {} bytes of text", content.len());
        Ok(FetchedPage { content, expand })
    }
}
