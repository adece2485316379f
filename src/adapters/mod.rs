//! Page classification and per-template exhibitor extraction.

pub mod a2z;
pub mod generic;
pub mod listing;
pub mod manifest;
pub mod mapyourshow;
pub mod smallworldlabs;
pub mod surfexpo;
pub mod wpma;

#[cfg(test)]
mod tests;

use crate::filter::LinkFilter;
use crate::results::ExhibitorRecord;
use crate::utils::{element_text, text_lines};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Directory site templates with their own extraction rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Manifest,
    MapYourShow,
    A2z,
    SmallWorldLabs,
    AffiliateSummit,
    GoeShow,
    Wpma,
    SurfExpo,
    /// Anything not recognised
    Generic,
}

/// URL fragments checked in order; the first hit decides the template
const HOST_PATTERNS: &[(&str, PageType)] = &[
    ("manifestvegas.com", PageType::Manifest),
    ("mapyourshow.com", PageType::MapYourShow),
    ("a2zinc.net", PageType::A2z),
    ("smallworldlabs.com", PageType::SmallWorldLabs),
    ("affiliatesummit.com", PageType::AffiliateSummit),
    ("goeshow.com", PageType::GoeShow),
    ("wpma.", PageType::Wpma),
    ("surfexpo.com", PageType::SurfExpo),
];

impl PageType {
    /// Determines the template from the directory URL
    pub fn from_url(url: &str) -> Self {
        let lower = url.to_lowercase();
        for (pattern, page_type) in HOST_PATTERNS {
            if lower.contains(pattern) {
                ::log::debug!("Classifying as {}: {}", page_type, url);
                return *page_type;
            }
        }

        ::log::debug!("Classifying as generic: {}", url);
        PageType::Generic
    }

    /// Tag used in records and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Manifest => "manifest",
            PageType::MapYourShow => "mapyourshow",
            PageType::A2z => "a2z",
            PageType::SmallWorldLabs => "smallworldlabs",
            PageType::AffiliateSummit => "affiliatesummit",
            PageType::GoeShow => "goeshow",
            PageType::Wpma => "wpma",
            PageType::SurfExpo => "surfexpo",
            PageType::Generic => "generic",
        }
    }

    /// Highest page number pagination may reach
    pub fn page_cap(&self) -> usize {
        match self {
            PageType::SmallWorldLabs => 100,
            PageType::Manifest => 20,
            _ => 5,
        }
    }

    /// Whether pagination runs when the caller did not ask either way
    pub fn paginates_by_default(&self) -> bool {
        matches!(self, PageType::SmallWorldLabs)
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTML of the current page together with the URL it was rendered from
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: Url,
    pub html: String,
}

impl PageSnapshot {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
        }
    }

    /// Parse the HTML. The document is not `Send`, so keep it out of await points.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }

    /// Link filter bound to this page's URL
    pub fn link_filter(&self) -> LinkFilter {
        LinkFilter::new(&self.url)
    }
}

/// Extraction strategy for one template
pub trait ExtractionAdapter: Send + Sync {
    /// Template this adapter handles
    fn page_type(&self) -> PageType;

    /// Pull exhibitor records out of a rendered page.
    ///
    /// Elements that cannot be turned into a record are skipped. Records are
    /// unique within one call under the template's dedup key.
    fn extract(&self, page: &PageSnapshot) -> Vec<ExhibitorRecord>;
}

/// Pick the adapter for a template
pub fn adapter_for(page_type: PageType) -> Box<dyn ExtractionAdapter> {
    match page_type {
        PageType::Manifest => Box::new(manifest::ManifestAdapter),
        PageType::MapYourShow => Box::new(mapyourshow::MapYourShowAdapter),
        PageType::A2z => Box::new(a2z::A2zAdapter),
        PageType::SmallWorldLabs => Box::new(smallworldlabs::SmallWorldLabsAdapter),
        PageType::AffiliateSummit | PageType::GoeShow => {
            Box::new(listing::ListingAdapter::new(page_type))
        }
        PageType::Wpma => Box::new(wpma::WpmaAdapter),
        PageType::SurfExpo => Box::new(surfexpo::SurfExpoAdapter),
        PageType::Generic => Box::new(generic::GenericAdapter),
    }
}

//
// Shared query helpers
//

/// Parse a selector, logging instead of panicking on a bad one
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            ::log::warn!("Invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}

/// All descendants of `root` matching `css`
pub(crate) fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => root.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// First descendant of `root` matching `css`
pub(crate) fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    root.select(&sel).next()
}

/// Text of the first non-empty match of `css` under `root`
pub(crate) fn first_text(root: ElementRef<'_>, css: &str) -> Option<String> {
    select_all(root, css)
        .into_iter()
        .map(element_text)
        .find(|t| !t.is_empty())
}

/// First non-empty text line of an element
pub(crate) fn first_line(element: ElementRef<'_>) -> Option<String> {
    text_lines(element).into_iter().next()
}

/// Drop matches that sit inside another match of the same query
pub(crate) fn outermost(elements: Vec<ElementRef<'_>>) -> Vec<ElementRef<'_>> {
    let ids: HashSet<_> = elements.iter().map(|e| e.id()).collect();
    elements
        .into_iter()
        .filter(|e| !e.ancestors().any(|a| ids.contains(&a.id())))
        .collect()
}

/// First link under `root` that the filter promotes to a website
pub(crate) fn first_website(root: ElementRef<'_>, filter: &LinkFilter) -> Option<String> {
    select_all(root, "a[href]").into_iter().find_map(|link| {
        let href = link.value().attr("href")?;
        filter.promote(href, &element_text(link))
    })
}
