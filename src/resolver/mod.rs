//! Finds a best-guess official website for a company name.
//!
//! Stage A guesses domains from the name and probes them. Stage B, only
//! when a searcher is configured, ranks web search results. Neither stage
//! fails the caller: every problem ends in "no website".

pub mod patterns;
pub mod scoring;
pub mod search;

pub use patterns::{HttpProbe, SiteProbe};
pub use scoring::ResolutionCandidate;
pub use search::{GoogleSearcher, SearchResult, WebSearcher};

use crate::config::ScraperConfig;
use crate::error::{ScrapeError, SearchError};
use url::Url;

/// Results requested from the searcher when not configured otherwise
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

pub struct WebsiteResolver {
    probe: Box<dyn SiteProbe>,
    searcher: Option<Box<dyn WebSearcher>>,
    max_results: usize,
}

impl WebsiteResolver {
    /// Pattern probing only
    pub fn new(probe: Box<dyn SiteProbe>) -> Self {
        Self {
            probe,
            searcher: None,
            max_results: DEFAULT_SEARCH_RESULTS,
        }
    }

    /// Enable Stage B
    pub fn with_searcher(mut self, searcher: Box<dyn WebSearcher>, max_results: usize) -> Self {
        self.searcher = Some(searcher);
        self.max_results = max_results;
        self
    }

    /// HTTP probing, plus Google search when credentials are configured
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let probe = HttpProbe::from_config(config)
            .map_err(|e| ScrapeError::Config(format!("could not build HTTP client: {}", e)))?;
        let resolver = Self::new(Box::new(probe));

        Ok(match &config.search {
            Some(search) => {
                resolver.with_searcher(Box::new(GoogleSearcher::new(search)), search.max_results)
            }
            None => {
                ::log::info!("No search credentials configured, website search limited to domain guessing");
                resolver
            }
        })
    }

    /// Best-guess website for `name`, or `None`
    pub async fn resolve(&self, name: &str) -> Option<String> {
        if let Some(url) = self.probe_patterns(name).await {
            ::log::debug!("Resolved {} by pattern: {}", name, url);
            return Some(url);
        }

        let searcher = self.searcher.as_ref()?;
        let query = format!("{} official website", name);
        match searcher.search(&query, self.max_results).await {
            Ok(results) => {
                let picked = scoring::select(name, &results);
                match &picked {
                    Some(url) => ::log::debug!("Resolved {} by search: {}", name, url),
                    None => ::log::debug!("No usable search result for {}", name),
                }
                picked
            }
            Err(e) => {
                match e {
                    SearchError::Quota | SearchError::Auth => {
                        ::log::warn!("Search unavailable for {}: {}", name, e)
                    }
                    _ => ::log::warn!("Search failed for {}: {}", name, e),
                }
                None
            }
        }
    }

    async fn probe_patterns(&self, name: &str) -> Option<String> {
        for url in patterns::candidate_urls(name) {
            // "Facebook" must not resolve to facebook.com
            let denied = Url::parse(&url)
                .ok()
                .and_then(|u| u.host_str().map(scoring::is_denied))
                .unwrap_or(true);
            if denied {
                continue;
            }
            if self.probe.exists(&url).await {
                return Some(url);
            }
        }
        None
    }
}
