use url::Url;

/// Directory platforms whose own pages are never an exhibitor's website
pub const PLATFORM_DOMAINS: &[&str] = &[
    "mapyourshow.com",
    "a2zinc.net",
    "smallworldlabs.com",
    "affiliatesummit.com",
    "goeshow.com",
    "manifestvegas.com",
    "surfexpo.com",
];

/// Social networks that are never accepted as a company website
pub const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "instagram.com",
    "youtube.com",
    "pinterest.com",
    "tiktok.com",
];

/// Top-level domains that make a bare hostname look like a company site
pub const CONVENTIONAL_TLDS: &[&str] = &[
    "com", "net", "org", "io", "co", "biz", "us", "info", "ca", "uk", "de", "eu", "au", "ai",
    "app", "tech",
];

/// Link text fragments that mark a link as "the website"
const WEBSITE_INDICATORS: &[&str] = &["website", "web site", "visit", "homepage", "www", "http"];

/// True if `host` is `domain` or any subdomain of it
pub fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}

pub fn is_platform_host(host: &str) -> bool {
    PLATFORM_DOMAINS.iter().any(|d| host_matches(host, d))
}

pub fn is_social_host(host: &str) -> bool {
    SOCIAL_DOMAINS.iter().any(|d| host_matches(host, d))
}

/// True if the hostname ends in one of the conventional TLDs
pub fn has_conventional_tld(host: &str) -> bool {
    host.rsplit('.')
        .next()
        .map(|tld| CONVENTIONAL_TLDS.contains(&tld.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// True if link text announces a website
pub fn looks_like_website_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    WEBSITE_INDICATORS.iter().any(|t| lower.contains(t))
}

/// Decides which hrefs on a directory page may become an exhibitor website
#[derive(Debug, Clone)]
pub struct LinkFilter {
    /// URL of the page the links were found on
    base: Url,

    /// Extra domains to reject, on top of platform and social domains
    excluded_domains: Vec<String>,
}

impl LinkFilter {
    /// Create a filter for links found on `base`
    pub fn new(base: &Url) -> Self {
        Self {
            base: base.clone(),
            excluded_domains: Vec::new(),
        }
    }

    /// Also reject links into `domain`
    pub fn excluding(mut self, domain: &str) -> Self {
        self.excluded_domains.push(domain.to_ascii_lowercase());
        self
    }

    /// Base URL of the page
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve protocol-relative and root-relative hrefs against the page URL.
    /// Returns `None` for anything that is not http(s) after resolution.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let url = self.base.join(href).ok()?;
        match url.scheme() {
            "http" | "https" => Some(url),
            _ => None,
        }
    }

    /// Whether a host is rejected outright: the page's own host, the
    /// directory platforms, social networks and any extra exclusions
    pub fn is_excluded_host(&self, host: &str) -> bool {
        if let Some(own) = self.base.host_str() {
            if host_matches(host, &own.to_ascii_lowercase()) {
                return true;
            }
        }

        is_platform_host(host)
            || is_social_host(host)
            || self.excluded_domains.iter().any(|d| host_matches(host, d))
    }

    /// Promote an href to a website if it passes every rule
    ///
    /// The resolved URL must be http(s), its host must not be excluded, and
    /// either the link text has a website indicator or the host has a
    /// conventional TLD.
    pub fn promote(&self, href: &str, link_text: &str) -> Option<String> {
        let url = self.resolve(href)?;
        let host = url.host_str()?.to_ascii_lowercase();

        if self.is_excluded_host(&host) {
            ::log::trace!("Rejected excluded link host: {}", host);
            return None;
        }

        if !looks_like_website_text(link_text) && !has_conventional_tld(&host) {
            ::log::trace!("Rejected irrelevant link: {}", url);
            return None;
        }

        Some(url.to_string())
    }
}
