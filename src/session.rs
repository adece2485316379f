//! One extraction run: classify, extract, paginate, resolve websites, and
//! report every step as an ordered event stream.

use crate::adapters::{PageType, adapter_for};
use crate::browser::{self, PageDriver};
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::pagination::Paginator;
use crate::resolver::WebsiteResolver;
use crate::results::{ExhibitorRecord, SessionEvent};
use crate::utils::sleep_or_cancel;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Whether multi-page directories are followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// Follow pages only for templates that paginate by default
    Auto,
    Enabled,
    Disabled,
}

impl PaginationMode {
    pub fn applies_to(self, page_type: PageType) -> bool {
        match self {
            PaginationMode::Auto => page_type.paginates_by_default(),
            PaginationMode::Enabled => true,
            PaginationMode::Disabled => false,
        }
    }
}

/// What a session does beyond extracting the first page
///
/// No `Default`: the library pipeline and the request boundary disagree on
/// whether website search is on, so callers pick a named constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOptions {
    pub find_websites: bool,
    pub max_website_searches: usize,
    pub pagination: PaginationMode,
}

impl ExtractionOptions {
    /// Library pipeline defaults: website search on, generous budget
    pub fn pipeline() -> Self {
        Self {
            find_websites: true,
            max_website_searches: 50,
            pagination: PaginationMode::Auto,
        }
    }

    /// Request boundary defaults: website search off
    pub fn request() -> Self {
        Self {
            find_websites: false,
            max_website_searches: 10,
            pagination: PaginationMode::Auto,
        }
    }

    pub fn with_find_websites(mut self, find_websites: bool) -> Self {
        self.find_websites = find_websites;
        self
    }

    pub fn with_max_website_searches(mut self, max: usize) -> Self {
        self.max_website_searches = max;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationMode) -> Self {
        self.pagination = pagination;
        self
    }
}

/// Options as they arrive in a JSON request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    #[serde(default)]
    pub find_websites: Option<bool>,

    #[serde(default)]
    pub max_website_searches: Option<usize>,

    /// Absent means "template default"
    #[serde(default)]
    pub handle_pagination: Option<bool>,
}

impl From<RequestOptions> for ExtractionOptions {
    fn from(request: RequestOptions) -> Self {
        let defaults = ExtractionOptions::request();
        Self {
            find_websites: request.find_websites.unwrap_or(defaults.find_websites),
            max_website_searches: request
                .max_website_searches
                .unwrap_or(defaults.max_website_searches),
            pagination: match request.handle_pagination {
                Some(true) => PaginationMode::Enabled,
                Some(false) => PaginationMode::Disabled,
                None => PaginationMode::Auto,
            },
        }
    }
}

/// Sending half of a session's event stream
///
/// A closed receiver cancels the session.
pub struct EventSink {
    tx: Option<mpsc::Sender<SessionEvent>>,
    cancel: CancellationToken,
}

impl EventSink {
    pub fn new(tx: mpsc::Sender<SessionEvent>, cancel: CancellationToken) -> Self {
        Self {
            tx: Some(tx),
            cancel,
        }
    }

    /// A sink that drops every event
    pub fn detached(cancel: CancellationToken) -> Self {
        Self { tx: None, cancel }
    }

    /// Deliver an event. Returns false if nobody is listening any more.
    pub async fn emit(&self, event: SessionEvent) -> bool {
        let Some(tx) = &self.tx else {
            return true;
        };
        if tx.send(event).await.is_err() {
            if !self.cancel.is_cancelled() {
                ::log::info!("Event receiver dropped, cancelling session");
                self.cancel.cancel();
            }
            return false;
        }
        true
    }
}

fn progress(message: String, current: usize, total: Option<usize>) -> SessionEvent {
    SessionEvent::Progress {
        message,
        current: Some(current),
        total,
    }
}

/// A validated extraction request bound to its collaborators
pub struct ExtractionSession {
    url: Url,
    page_type: PageType,
    options: ExtractionOptions,
    config: ScraperConfig,
    resolver: WebsiteResolver,
    cancel: CancellationToken,
}

impl ExtractionSession {
    /// Validate the directory URL and classify it
    pub fn new(
        url: &str,
        options: ExtractionOptions,
        config: ScraperConfig,
        resolver: WebsiteResolver,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let parsed = Url::parse(url.trim()).map_err(|_| ScrapeError::InvalidUrl {
            url: url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ScrapeError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let page_type = PageType::from_url(parsed.as_str());
        Ok(Self {
            url: parsed,
            page_type,
            options,
            config,
            resolver,
            cancel,
        })
    }

    fn ensure_active(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(ScrapeError::Cancelled)
        } else {
            Ok(())
        }
    }

    async fn pause(&self, duration: std::time::Duration) -> Result<()> {
        if sleep_or_cancel(duration, &self.cancel).await {
            Ok(())
        } else {
            Err(ScrapeError::Cancelled)
        }
    }

    /// Run the whole pipeline on `page`, reporting to `events`
    ///
    /// Emits `start`, progress and record events, and `complete` on success.
    /// The caller reports errors and owns the page.
    pub async fn run(
        &self,
        page: &dyn PageDriver,
        events: &EventSink,
    ) -> Result<Vec<ExhibitorRecord>> {
        events
            .emit(SessionEvent::Start {
                url: self.url.to_string(),
            })
            .await;
        self.ensure_active()?;

        ::log::info!("Extracting {} with the {} template", self.url, self.page_type);
        browser::navigate_with_fallback(page, self.url.as_str(), &self.config, &self.cancel)
            .await?;
        self.pause(self.config.render_settle()).await?;

        let records = self.extract_pages(page, events).await?;
        ::log::info!("Extracted {} exhibitors from {}", records.len(), self.url);

        let records = if self.options.find_websites {
            self.resolve_websites(records, events).await?
        } else {
            for record in &records {
                events
                    .emit(SessionEvent::Exhibitor {
                        data: record.clone(),
                    })
                    .await;
            }
            records
        };

        events
            .emit(SessionEvent::Complete {
                count: records.len(),
            })
            .await;
        Ok(records)
    }

    async fn extract_pages(
        &self,
        page: &dyn PageDriver,
        events: &EventSink,
    ) -> Result<Vec<ExhibitorRecord>> {
        let adapter = adapter_for(self.page_type);

        let snap = browser::snapshot(page).await?;
        let mut records = adapter.extract(&snap);
        events
            .emit(progress(
                format!("Page 1: found {} exhibitors", records.len()),
                1,
                None,
            ))
            .await;

        if !self.options.pagination.applies_to(self.page_type) {
            return Ok(records);
        }

        let mut paginator =
            Paginator::new(page, adapter.as_ref(), &self.config, &self.cancel, &records);
        while let Some(more) = paginator.advance().await? {
            let current = paginator.state().current_page;
            events
                .emit(progress(
                    format!("Page {}: found {} exhibitors", current, more.len()),
                    current,
                    None,
                ))
                .await;
            records.extend(more);
        }

        Ok(records)
    }

    /// Emit records that have a website, then resolve the rest one at a time
    ///
    /// The returned list is in emission order.
    async fn resolve_websites(
        &self,
        records: Vec<ExhibitorRecord>,
        events: &EventSink,
    ) -> Result<Vec<ExhibitorRecord>> {
        let (mut done, missing): (Vec<_>, Vec<_>) =
            records.into_iter().partition(ExhibitorRecord::has_website);

        for record in &done {
            events
                .emit(SessionEvent::Exhibitor {
                    data: record.clone(),
                })
                .await;
        }

        let budget = missing.len().min(self.options.max_website_searches);
        if missing.len() > budget {
            ::log::info!(
                "Searching websites for {} of {} exhibitors",
                budget,
                missing.len()
            );
        }

        let mut missing = missing.into_iter();
        for (i, record) in missing.by_ref().take(budget).enumerate() {
            if i > 0 {
                self.pause(self.config.resolution_delay()).await?;
            }
            self.ensure_active()?;

            events
                .emit(progress(
                    format!("Finding website for {}", record.company_name),
                    i + 1,
                    Some(budget),
                ))
                .await;

            let website = self.resolver.resolve(&record.company_name).await;
            let record = record.with_website(website);
            events
                .emit(SessionEvent::Exhibitor {
                    data: record.clone(),
                })
                .await;
            done.push(record);
        }

        for record in missing {
            events
                .emit(SessionEvent::Exhibitor {
                    data: record.clone(),
                })
                .await;
            done.push(record);
        }

        Ok(done)
    }
}
