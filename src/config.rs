use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Runtime settings shared by all sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Ask the browser to run without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Timeout for the first navigation attempt
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Timeout for the relaxed retry after a failed navigation
    #[serde(default = "default_fallback_navigation_timeout_secs")]
    pub fallback_navigation_timeout_secs: u64,

    /// Pause after navigation so script-rendered listings can appear
    #[serde(default = "default_render_settle_ms")]
    pub render_settle_ms: u64,

    /// Bounded wait for the page indicator and content after a pagination click
    #[serde(default = "default_pagination_wait_secs")]
    pub pagination_wait_secs: u64,

    /// Pause after each pagination advance
    #[serde(default = "default_pagination_settle_ms")]
    pub pagination_settle_ms: u64,

    /// Timeout for each pattern probe
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Redirects followed by a pattern probe
    #[serde(default = "default_probe_max_redirects")]
    pub probe_max_redirects: usize,

    /// Delay between website resolution attempts
    #[serde(default = "default_resolution_delay_ms")]
    pub resolution_delay_ms: u64,

    /// External search credentials; search is skipped when absent
    #[serde(default)]
    pub search: Option<SearchConfig>,
}

/// Credentials and endpoint for the external search API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub api_key: String,

    /// Programmable search engine id
    pub engine_id: String,

    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Results requested per query
    #[serde(default = "default_search_max_results")]
    pub max_results: usize,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_navigation_timeout_secs() -> u64 {
    60
}

fn default_fallback_navigation_timeout_secs() -> u64 {
    30
}

fn default_render_settle_ms() -> u64 {
    3000
}

fn default_pagination_wait_secs() -> u64 {
    10
}

fn default_pagination_settle_ms() -> u64 {
    1500
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_probe_max_redirects() -> usize {
    5
}

fn default_resolution_delay_ms() -> u64 {
    1000
}

fn default_search_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_search_max_results() -> usize {
    5
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            navigation_timeout_secs: default_navigation_timeout_secs(),
            fallback_navigation_timeout_secs: default_fallback_navigation_timeout_secs(),
            render_settle_ms: default_render_settle_ms(),
            pagination_wait_secs: default_pagination_wait_secs(),
            pagination_settle_ms: default_pagination_settle_ms(),
            probe_timeout_secs: default_probe_timeout_secs(),
            probe_max_redirects: default_probe_max_redirects(),
            resolution_delay_ms: default_resolution_delay_ms(),
            search: None,
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ScrapeError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override settings from `WEBDRIVER_URL`, `SEARCH_API_KEY` and `SEARCH_ENGINE_ID`
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    fn with_env_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(webdriver_url) = var("WEBDRIVER_URL").filter(|v| !v.is_empty()) {
            self.webdriver_url = webdriver_url;
        }

        let api_key = var("SEARCH_API_KEY").filter(|v| !v.is_empty());
        let engine_id = var("SEARCH_ENGINE_ID").filter(|v| !v.is_empty());
        if let (Some(api_key), Some(engine_id)) = (api_key, engine_id) {
            self.search = Some(SearchConfig {
                api_key,
                engine_id,
                endpoint: self
                    .search
                    .as_ref()
                    .map(|s| s.endpoint.clone())
                    .unwrap_or_else(default_search_endpoint),
                max_results: default_search_max_results(),
            });
        }
        self
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn fallback_navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.fallback_navigation_timeout_secs)
    }

    pub fn render_settle(&self) -> Duration {
        Duration::from_millis(self.render_settle_ms)
    }

    pub fn pagination_wait(&self) -> Duration {
        Duration::from_secs(self.pagination_wait_secs)
    }

    pub fn pagination_settle(&self) -> Duration {
        Duration::from_millis(self.pagination_settle_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn resolution_delay(&self) -> Duration {
        Duration::from_millis(self.resolution_delay_ms)
    }
}
