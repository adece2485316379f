//! In-memory page driver serving canned HTML.

use super::{ElementTarget, PageDriver, WaitCondition};
use crate::error::PageError;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

type PageSource = Box<dyn Fn(usize) -> Option<String> + Send + Sync>;

/// Serves page `n` after `n` successful clicks. A click that would move
/// past the last page leaves the current page in place.
pub struct FixturePage {
    source: PageSource,
    url: Mutex<Url>,
    index: AtomicUsize,
    failing_navigations: AtomicUsize,
    navigations: Mutex<Vec<WaitCondition>>,
    clicks: Mutex<Vec<ElementTarget>>,
    closed: AtomicBool,
    latency: Duration,
}

impl FixturePage {
    /// A fixed sequence of pages
    pub fn new(pages: Vec<&str>) -> Self {
        let pages: Vec<String> = pages.into_iter().map(str::to_string).collect();
        Self::from_fn(move |n| pages.get(n).cloned())
    }

    /// Pages generated on demand; `None` ends the sequence
    pub fn from_fn(source: impl Fn(usize) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(source),
            url: Mutex::new(Url::parse("https://example.com/").unwrap()),
            index: AtomicUsize::new(0),
            failing_navigations: AtomicUsize::new(0),
            navigations: Mutex::new(Vec::new()),
            clicks: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
            latency: Duration::ZERO,
        }
    }

    /// Make the next `count` navigations fail
    pub fn failing_navigations(self, count: usize) -> Self {
        self.failing_navigations.store(count, Ordering::SeqCst);
        self
    }

    /// Delay navigations and waits by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn navigations(&self) -> Vec<WaitCondition> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn clicks(&self) -> Vec<ElementTarget> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn current(&self) -> String {
        (self.source)(self.index.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

#[async_trait]
impl PageDriver for FixturePage {
    async fn navigate(
        &self,
        url: &str,
        wait: WaitCondition,
        timeout: Duration,
    ) -> Result<(), PageError> {
        self.navigations.lock().unwrap().push(wait);
        tokio::time::sleep(self.latency).await;
        if self.failing_navigations.load(Ordering::SeqCst) > 0 {
            self.failing_navigations.fetch_sub(1, Ordering::SeqCst);
            return Err(PageError::Timeout {
                context: format!("loading {}", url),
                secs: timeout.as_secs(),
            });
        }

        let parsed = Url::parse(url).map_err(|e| PageError::Command(e.to_string()))?;
        *self.url.lock().unwrap() = parsed;
        self.index.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn content(&self) -> Result<String, PageError> {
        Ok(self.current())
    }

    async fn current_url(&self) -> Result<Url, PageError> {
        Ok(self.url.lock().unwrap().clone())
    }

    async fn click(&self, target: &ElementTarget) -> Result<(), PageError> {
        let exists = {
            let doc = Html::parse_document(&self.current());
            let selector = Selector::parse(&target.css)
                .map_err(|e| PageError::Command(format!("{:?}", e)))?;
            doc.select(&selector).nth(target.index).is_some()
        };
        if !exists {
            return Err(PageError::ElementNotFound(format!(
                "{} #{}",
                target.css, target.index
            )));
        }

        self.clicks.lock().unwrap().push(target.clone());
        let next = self.index.load(Ordering::SeqCst) + 1;
        if (self.source)(next).is_some() {
            self.index.store(next, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn wait_for_element(&self, css: &str, _timeout: Duration) -> Result<bool, PageError> {
        tokio::time::sleep(self.latency).await;
        let doc = Html::parse_document(&self.current());
        let selector =
            Selector::parse(css).map_err(|e| PageError::Command(format!("{:?}", e)))?;
        let found = doc.select(&selector).next().is_some();
        Ok(found)
    }

    async fn wait_until_ready(&self, _timeout: Duration) -> Result<bool, PageError> {
        tokio::time::sleep(self.latency).await;
        Ok(true)
    }

    async fn close(&self) -> Result<(), PageError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
