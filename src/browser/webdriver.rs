use super::{ElementTarget, PageDriver, POLL_INTERVAL, WaitCondition};
use crate::config::ScraperConfig;
use crate::error::PageError;
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

/// WebDriver ports tried when the configured endpoint is unreachable
const FALLBACK_WEBDRIVER_URLS: &[&str] = &[
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Extra quiet time after the load event when waiting for network idle
const NETWORK_IDLE_GRACE: Duration = Duration::from_millis(500);

/// A browser page driven over WebDriver, owned by a single session
pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    /// Open a new browser session
    ///
    /// Tries the configured endpoint first, then the common local defaults.
    pub async fn connect(config: &ScraperConfig) -> Result<Self, PageError> {
        let mut last_error = String::new();

        let candidates = std::iter::once(config.webdriver_url.as_str()).chain(
            FALLBACK_WEBDRIVER_URLS
                .iter()
                .copied()
                .filter(|url| *url != config.webdriver_url),
        );

        for url in candidates {
            let mut builder = ClientBuilder::native();
            builder.capabilities(capabilities(config.headless));

            match builder.connect(url).await {
                Ok(client) => {
                    ::log::debug!("Connected to WebDriver at {}", url);
                    return Ok(Self { client });
                }
                Err(e) => {
                    ::log::debug!("WebDriver at {} unavailable: {}", url, e);
                    last_error = e.to_string();
                }
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(PageError::Connect(last_error))
    }

    async fn ready_state(&self) -> Result<String, PageError> {
        let state = self
            .client
            .execute("return document.readyState", Vec::new())
            .await?;
        Ok(state.as_str().unwrap_or_default().to_string())
    }

    /// Poll `document.readyState` until `accept` holds
    async fn poll_ready_state(
        &self,
        limit: Duration,
        accept: impl Fn(&str) -> bool + Send + Sync,
    ) -> Result<bool, PageError> {
        let deadline = Instant::now() + limit;
        loop {
            if accept(&self.ready_state().await?) {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

/// Capabilities for Chrome and Firefox, optionally headless
fn capabilities(headless: bool) -> serde_json::Map<String, Value> {
    let mut chrome_args = vec!["--disable-gpu", "--no-sandbox", "--window-size=1920,1080"];
    let mut firefox_args = Vec::new();
    if headless {
        chrome_args.push("--headless=new");
        firefox_args.push("-headless");
    }

    let mut caps = serde_json::Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
    caps.insert("moz:firefoxOptions".to_string(), json!({ "args": firefox_args }));
    caps
}

#[async_trait]
impl PageDriver for WebDriverPage {
    async fn navigate(
        &self,
        url: &str,
        wait: WaitCondition,
        limit: Duration,
    ) -> Result<(), PageError> {
        let started = Instant::now();
        let timed_out = || PageError::Timeout {
            context: format!("loading {}", url),
            secs: limit.as_secs(),
        };

        match timeout(limit, self.client.goto(url)).await {
            Ok(result) => result?,
            Err(_) => return Err(timed_out()),
        }

        let remaining = limit.saturating_sub(started.elapsed());
        let settled = match wait {
            WaitCondition::NetworkIdle => {
                let complete = self.poll_ready_state(remaining, |s| s == "complete").await?;
                if complete {
                    tokio::time::sleep(NETWORK_IDLE_GRACE).await;
                }
                complete
            }
            WaitCondition::DomContentLoaded => {
                self.poll_ready_state(remaining, |s| s != "loading").await?
            }
        };

        if settled { Ok(()) } else { Err(timed_out()) }
    }

    async fn content(&self) -> Result<String, PageError> {
        Ok(self.client.source().await?)
    }

    async fn current_url(&self) -> Result<Url, PageError> {
        Ok(self.client.current_url().await?)
    }

    async fn click(&self, target: &ElementTarget) -> Result<(), PageError> {
        let elements = self.client.find_all(Locator::Css(&target.css)).await?;
        let element = elements
            .into_iter()
            .nth(target.index)
            .ok_or_else(|| PageError::ElementNotFound(format!("{} #{}", target.css, target.index)))?;

        if !element.is_displayed().await.unwrap_or(true) {
            return Err(PageError::ElementNotFound(format!(
                "{} #{} is not displayed",
                target.css, target.index
            )));
        }

        // Scroll into view first; some pagers ignore clicks off-screen
        let _ = self
            .client
            .execute(
                "arguments[0].scrollIntoView({block: 'center'});",
                vec![serde_json::to_value(&element).unwrap_or(Value::Null)],
            )
            .await;

        element.click().await?;
        Ok(())
    }

    async fn wait_for_element(&self, css: &str, limit: Duration) -> Result<bool, PageError> {
        match self
            .client
            .wait()
            .at_most(limit)
            .for_element(Locator::Css(css))
            .await
        {
            Ok(_) => Ok(true),
            Err(CmdError::WaitTimeout) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn wait_until_ready(&self, limit: Duration) -> Result<bool, PageError> {
        self.poll_ready_state(limit, |s| s == "complete").await
    }

    async fn close(&self) -> Result<(), PageError> {
        self.client.clone().close().await?;
        Ok(())
    }
}
