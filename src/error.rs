//! Typed errors for extraction sessions.
//!
//! Only failures that end a session are represented here. Per-element,
//! per-page and per-company problems are logged and skipped where they occur.

use thiserror::Error;

/// Errors raised by the page-rendering driver.
#[derive(Debug, Error)]
pub enum PageError {
    /// Could not open a rendering context
    #[error("failed to connect to WebDriver: {0}")]
    Connect(String),

    /// A driver command failed
    #[error("driver command failed: {0}")]
    Command(String),

    /// A bounded operation ran out of time
    #[error("timed out after {secs}s while {context}")]
    Timeout { context: String, secs: u64 },

    /// The addressed element does not exist on the current page
    #[error("element not found: {0}")]
    ElementNotFound(String),
}

impl From<fantoccini::error::CmdError> for PageError {
    fn from(e: fantoccini::error::CmdError) -> Self {
        PageError::Command(e.to_string())
    }
}

/// Errors raised by an external search provider.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Rate limit or daily quota exhausted (HTTP 429)
    #[error("search quota exceeded")]
    Quota,

    /// Credentials rejected (HTTP 403)
    #[error("search credentials rejected")]
    Auth,

    /// Any other non-success status
    #[error("search returned HTTP {0}")]
    Status(u16),

    /// Transport failure
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected shape
    #[error("could not decode search response: {0}")]
    Decode(String),
}

/// Errors that terminate an extraction session.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Input URL could not be parsed or is not http(s)
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Rendering context could not be acquired
    #[error("could not acquire a browser page: {0}")]
    ContextAcquisition(#[source] PageError),

    /// Initial navigation failed even with the relaxed wait condition
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Driver failure outside of navigation
    #[error("page error: {0}")]
    Page(#[from] PageError),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(String),

    /// Session was cancelled by the caller
    #[error("session cancelled")]
    Cancelled,
}

impl From<std::io::Error> for ScrapeError {
    fn from(e: std::io::Error) -> Self {
        ScrapeError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(e: serde_json::Error) -> Self {
        ScrapeError::Config(e.to_string())
    }
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;
