use super::{ExtractionAdapter, PageSnapshot, PageType, first_line, first_text, outermost, select_all};
use crate::filter::LinkFilter;
use crate::results::ExhibitorRecord;
use crate::utils::{SeenKeys, is_punctuation_only, normalize_whitespace};
use scraper::ElementRef;

/// Candidate containers, tried in order until one yields records
const CANDIDATE_SELECTORS: &[&str] = &[
    ".exhibitor",
    ".exhibitor-item",
    ".exhibitor-card",
    ".company",
    ".company-item",
    ".vendor",
    ".sponsor",
    "[data-exhibitor]",
    "[class*='exhibitor']",
    "[class*='company']",
    "[class*='vendor']",
    "[class*='sponsor']",
];

/// Rows scanned when no container matched
const ROW_SELECTOR: &str = "li, tr";

const NAME_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, .name, [class*='name'], [class*='title'], strong";

/// Interface text that is never a company name
const STOPWORDS: &[&str] = &[
    "view",
    "view all",
    "view more",
    "view details",
    "next",
    "previous",
    "prev",
    "login",
    "log in",
    "sign in",
    "sign up",
    "register",
    "more",
    "details",
    "search",
    "filter",
    "filters",
    "menu",
    "home",
    "back",
    "close",
    "show more",
    "load more",
    "read more",
    "website",
    "visit website",
    "contact",
    "exhibitors",
];

pub struct GenericAdapter;

impl ExtractionAdapter for GenericAdapter {
    fn page_type(&self) -> PageType {
        PageType::Generic
    }

    fn extract(&self, page: &PageSnapshot) -> Vec<ExhibitorRecord> {
        let doc = page.document();
        let root = doc.root_element();
        let filter = page.link_filter();

        for css in CANDIDATE_SELECTORS {
            let candidates = outermost(select_all(root, css));
            if candidates.is_empty() {
                continue;
            }
            let records = collect(candidates, &filter, |el| {
                first_text(el, NAME_SELECTOR).or_else(|| first_line(el))
            });
            if !records.is_empty() {
                ::log::debug!("generic: {} records via {}", records.len(), css);
                return records;
            }
        }

        ::log::debug!("generic: no containers matched, scanning rows");
        collect(select_all(root, ROW_SELECTOR), &filter, first_line)
    }
}

fn collect<'a>(
    elements: Vec<ElementRef<'a>>,
    filter: &LinkFilter,
    name_of: impl Fn(ElementRef<'a>) -> Option<String>,
) -> Vec<ExhibitorRecord> {
    let mut seen = SeenKeys::new();
    elements
        .into_iter()
        .filter_map(|el| {
            let name = normalize_whitespace(&name_of(el)?);
            if !is_candidate_name(&name) {
                return None;
            }
            let record = ExhibitorRecord::new(&name, PageType::Generic)?;
            Some(record.with_website(external_site(el, filter)))
        })
        .filter(|record| seen.insert(&[&record.company_name]))
        .collect()
}

/// First attached link that is an external company site with a conventional TLD
fn external_site(el: ElementRef<'_>, filter: &LinkFilter) -> Option<String> {
    select_all(el, "a[href]")
        .into_iter()
        .find_map(|link| filter.promote(link.value().attr("href")?, ""))
        .or_else(|| {
            // The candidate itself may be the link
            (el.value().name() == "a")
                .then(|| el.value().attr("href"))
                .flatten()
                .and_then(|href| filter.promote(href, ""))
        })
}

/// Rejects interface words and punctuation-only text
pub fn is_candidate_name(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    !lower.is_empty() && !is_punctuation_only(&lower) && !STOPWORDS.contains(&lower.as_str())
}
