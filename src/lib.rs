// Re-export modules
pub mod adapters;
pub mod browser;
pub mod config;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod resolver;
pub mod results;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use adapters::PageType;
pub use config::ScraperConfig;
pub use error::{Result, ScrapeError};
pub use results::{ExhibitorRecord, ScrapeResponse, SessionEvent};
pub use session::{ExtractionOptions, PaginationMode, RequestOptions};

use browser::{PageDriver, WebDriverPage};
use resolver::WebsiteResolver;
use session::{EventSink, ExtractionSession};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Events buffered before the session waits for the consumer
const EVENT_BUFFER: usize = 256;

/// Main builder for an exhibitor extraction session
pub struct Exhibitors {
    url: String,
    options: ExtractionOptions,
    config: ScraperConfig,
    resolver: Option<WebsiteResolver>,
    page: Option<Box<dyn PageDriver>>,
    cancel: CancellationToken,
}

impl Exhibitors {
    /// Create a builder for the directory at `url`
    ///
    /// Settings start from defaults with environment overrides applied.
    pub fn new(url: impl Into<String>, options: ExtractionOptions) -> Self {
        Self {
            url: url.into(),
            options,
            config: ScraperConfig::default().with_env(),
            resolver: None,
            page: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Set the runtime configuration
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file; environment variables still win
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = ScraperConfig::from_file(path)?.with_env();
        Ok(self.with_config(config))
    }

    /// Use a custom website resolver instead of one built from the config
    pub fn with_resolver(mut self, resolver: WebsiteResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Use an already open page instead of connecting to WebDriver
    pub fn with_page(mut self, page: Box<dyn PageDriver>) -> Self {
        self.page = Some(page);
        self
    }

    /// Stop the session when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Start the session and get a receiver for its events
    ///
    /// The first event is always `connected` and the last is exactly one of
    /// `complete` or `error`. Dropping the receiver cancels the session.
    pub fn generate(self) -> mpsc::Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let sink = EventSink::new(tx, self.cancel.clone());

        tokio::spawn(async move {
            if !sink.emit(SessionEvent::Connected).await {
                return;
            }
            if let Err(e) = self.execute(&sink).await {
                match e {
                    ScrapeError::Cancelled => ::log::info!("Extraction cancelled"),
                    _ => ::log::error!("Extraction failed: {}", e),
                }
                sink.emit(SessionEvent::Error {
                    error: e.to_string(),
                })
                .await;
            }
        });

        rx
    }

    /// Run the session to completion and return every record
    pub async fn collect(self) -> Result<Vec<ExhibitorRecord>> {
        let sink = EventSink::detached(self.cancel.clone());
        self.execute(&sink).await
    }

    async fn execute(self, sink: &EventSink) -> Result<Vec<ExhibitorRecord>> {
        let resolver = match self.resolver {
            Some(resolver) => resolver,
            None => WebsiteResolver::from_config(&self.config)?,
        };
        let session = ExtractionSession::new(
            &self.url,
            self.options,
            self.config.clone(),
            resolver,
            self.cancel.clone(),
        )?;

        let page: Box<dyn PageDriver> = match self.page {
            Some(page) => page,
            None => Box::new(
                WebDriverPage::connect(&self.config)
                    .await
                    .map_err(ScrapeError::ContextAcquisition)?,
            ),
        };

        let result = session.run(page.as_ref(), sink).await;

        // The page is released whatever the outcome
        if let Err(e) = page.close().await {
            ::log::warn!("Failed to close browser page: {}", e);
        }
        result
    }
}
