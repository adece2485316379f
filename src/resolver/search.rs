//! Stage B: external web search.

use crate::config::SearchConfig;
use crate::error::SearchError;
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

/// One hit returned by a search provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

impl SearchResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            snippet: String::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Lowercased hostname, if the URL parses
    pub fn domain(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()?
            .host_str()
            .map(|h| h.trim_end_matches('.').to_ascii_lowercase())
    }
}

/// Open-web search used when a company's domain cannot be guessed
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Up to `limit` results for `query`, in the provider's rank order
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

/// Google Programmable Search (Custom Search JSON API)
pub struct GoogleSearcher {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
    endpoint: String,
}

impl GoogleSearcher {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
            endpoint: config.endpoint.clone(),
        }
    }
}

#[async_trait]
impl WebSearcher for GoogleSearcher {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        // The API serves at most 10 results per request
        let num = limit.clamp(1, 10).to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        match status.as_u16() {
            429 => return Err(SearchError::Quota),
            401 | 403 => return Err(SearchError::Auth),
            _ if !status.is_success() => return Err(SearchError::Status(status.as_u16())),
            _ => {}
        }

        let body: GoogleResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        Ok(body
            .items
            .into_iter()
            .take(limit)
            .map(|item| {
                SearchResult::new(item.link)
                    .with_title(item.title)
                    .with_snippet(item.snippet)
            })
            .collect())
    }
}
