//! Stage A: guess a company's domain from its name and check it answers.

use crate::config::ScraperConfig;
use async_trait::async_trait;
use std::time::Duration;

/// Upper bound on guessed URLs per company
pub const MAX_CANDIDATE_URLS: usize = 8;

/// Lowercase ASCII alphanumerics separated by single spaces
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else if c.is_whitespace() {
                ' '
            } else {
                // Punctuation inside a word ("O'Neil", "AT&T") joins it
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Concatenated, hyphenated and first-word forms, deduplicated in that order
pub fn candidate_roots(name: &str) -> Vec<String> {
    let normalized = normalize_name(name);
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut roots: Vec<String> = Vec::with_capacity(3);
    for root in [words.concat(), words.join("-"), words[0].to_string()] {
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

/// `https://{root}.com` and `https://www.{root}.com` for each root
pub fn candidate_urls(name: &str) -> Vec<String> {
    candidate_roots(name)
        .iter()
        .flat_map(|root| [format!("https://{}.com", root), format!("https://www.{}.com", root)])
        .take(MAX_CANDIDATE_URLS)
        .collect()
}

/// Existence check for a guessed URL
#[async_trait]
pub trait SiteProbe: Send + Sync {
    /// Whether `url` answers with a 2xx or 3xx status
    async fn exists(&self, url: &str) -> bool;
}

/// HEAD requests with a short timeout and a bounded redirect chain
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration, max_redirects: usize) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .user_agent(concat!("exhibitor-scout/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.probe_timeout(), config.probe_max_redirects)
    }
}

#[async_trait]
impl SiteProbe for HttpProbe {
    async fn exists(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                ::log::trace!("Probe {} -> {}", url, status);
                status.is_success() || status.is_redirection()
            }
            Err(e) => {
                ::log::trace!("Probe {} failed: {}", url, e);
                false
            }
        }
    }
}
