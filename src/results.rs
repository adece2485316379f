use crate::adapters::PageType;
use crate::utils::normalize_whitespace;
use serde::{Deserialize, Serialize};

/// Shortest company name that is kept
pub const MIN_NAME_LEN: usize = 2;

/// Longest company name that is kept
pub const MAX_NAME_LEN: usize = 200;

/// A single exhibitor found on a directory page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitorRecord {
    /// Trimmed company name
    pub company_name: String,

    /// Absolute http(s) URL, or empty when unknown
    #[serde(default)]
    pub website: String,

    /// Template the record was extracted with
    pub source: PageType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub business_types: Vec<String>,
}

impl ExhibitorRecord {
    /// Create a record from a raw name, or `None` if the name is not usable
    ///
    /// Whitespace is collapsed before the length check.
    pub fn new(raw_name: &str, source: PageType) -> Option<Self> {
        let company_name = normalize_whitespace(raw_name);
        let len = company_name.chars().count();
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
            return None;
        }

        Some(Self {
            company_name,
            website: String::new(),
            source,
            booth: None,
            category: None,
            location: None,
            description: None,
            business_types: Vec::new(),
        })
    }

    /// Attach a website that already passed `LinkFilter::promote`
    pub fn with_website(mut self, website: Option<String>) -> Self {
        self.website = website.unwrap_or_default();
        self
    }

    pub fn with_booth(mut self, booth: Option<String>) -> Self {
        self.booth = non_empty(booth);
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = non_empty(category);
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = non_empty(location);
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = non_empty(description);
        self
    }

    pub fn with_business_types(mut self, business_types: Vec<String>) -> Self {
        self.business_types = business_types;
        self
    }

    /// Whether a website is already known for this exhibitor
    pub fn has_website(&self) -> bool {
        !self.website.is_empty()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| normalize_whitespace(&v))
        .filter(|v| !v.is_empty())
}

/// Events delivered to the consumer of a session, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SessionEvent {
    /// The stream is open
    Connected,

    /// Extraction of `url` has begun
    Start { url: String },

    /// Human-readable progress, with a position when one is known
    Progress {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total: Option<usize>,
    },

    /// One finished record
    Exhibitor { data: ExhibitorRecord },

    /// The session finished with `count` records
    Complete { count: usize },

    /// The session failed
    Error { error: String },
}

impl SessionEvent {
    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionEvent::Complete { .. } | SessionEvent::Error { .. }
        )
    }
}

/// Non-streaming response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub success: bool,

    /// Present on success, even when empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<ExhibitorRecord>>,

    pub count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResponse {
    pub fn ok(data: Vec<ExhibitorRecord>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            count: 0,
            error: Some(error.into()),
        }
    }
}
