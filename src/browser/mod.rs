//! The page-rendering collaborator: a browser page we navigate, query and click.

pub mod webdriver;

#[cfg(test)]
pub(crate) mod fixture;

use crate::adapters::PageSnapshot;
use crate::config::ScraperConfig;
use crate::error::{PageError, ScrapeError};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

pub use webdriver::WebDriverPage;

/// Interval between polls of a bounded wait
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// What a navigation waits for before it counts as done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// Document fully loaded and network quiet
    NetworkIdle,
    /// Document parsed; subresources may still be loading
    DomContentLoaded,
}

/// The `index`-th element matching `css`, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTarget {
    pub css: String,
    pub index: usize,
}

impl ElementTarget {
    pub fn new(css: impl Into<String>, index: usize) -> Self {
        Self {
            css: css.into(),
            index,
        }
    }
}

/// A single rendered page owned by one session
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url`, waiting for `wait` at most `timeout`
    async fn navigate(
        &self,
        url: &str,
        wait: WaitCondition,
        timeout: Duration,
    ) -> Result<(), PageError>;

    /// Current page HTML
    async fn content(&self) -> Result<String, PageError>;

    /// URL the page is showing now
    async fn current_url(&self) -> Result<Url, PageError>;

    /// Click an element
    async fn click(&self, target: &ElementTarget) -> Result<(), PageError>;

    /// Wait until an element matching `css` exists. `Ok(false)` on timeout.
    async fn wait_for_element(&self, css: &str, timeout: Duration) -> Result<bool, PageError>;

    /// Wait until the document reports it finished loading. `Ok(false)` on timeout.
    async fn wait_until_ready(&self, timeout: Duration) -> Result<bool, PageError>;

    /// Release the page
    async fn close(&self) -> Result<(), PageError>;
}

/// Capture URL and HTML of the current page
pub async fn snapshot(page: &dyn PageDriver) -> Result<PageSnapshot, PageError> {
    let url = page.current_url().await?;
    let html = page.content().await?;
    Ok(PageSnapshot::new(url, html))
}

/// Poll page snapshots until `predicate` holds
///
/// Returns false on timeout or cancellation. Snapshot errors count as "not yet".
pub async fn wait_for_condition<F>(
    page: &dyn PageDriver,
    timeout: Duration,
    cancel: &CancellationToken,
    predicate: F,
) -> bool
where
    F: Fn(&PageSnapshot) -> bool + Send + Sync,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(snap) = snapshot(page).await {
            if predicate(&snap) {
                return true;
            }
        }

        if Instant::now() >= deadline || cancel.is_cancelled() {
            return false;
        }

        tokio::select! {
            _ = cancel.cancelled() => return false,
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    }
}

/// Run a driver call unless `cancel` fires first
pub async fn or_cancel<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T, PageError>>,
) -> Result<Result<T, PageError>, ScrapeError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(ScrapeError::Cancelled),
        result = call => Ok(result),
    }
}

/// Navigate with the strict wait condition, retrying once with the relaxed one
pub async fn navigate_with_fallback(
    page: &dyn PageDriver,
    url: &str,
    config: &ScraperConfig,
    cancel: &CancellationToken,
) -> Result<(), ScrapeError> {
    let strict = page.navigate(url, WaitCondition::NetworkIdle, config.navigation_timeout());
    match or_cancel(cancel, strict).await? {
        Ok(()) => return Ok(()),
        Err(e) => {
            ::log::warn!(
                "Navigation to {} did not settle ({}), retrying with relaxed wait",
                url,
                e
            );
        }
    }

    let relaxed = page.navigate(
        url,
        WaitCondition::DomContentLoaded,
        config.fallback_navigation_timeout(),
    );
    or_cancel(cancel, relaxed)
        .await?
        .map_err(|e| ScrapeError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })
}
