use super::{
    ExtractionAdapter, PageSnapshot, PageType, first_line, first_text, first_website, outermost,
    select_all,
};
use crate::results::ExhibitorRecord;
use crate::utils::SeenKeys;

/// Card selectors for exhibitor/vendor listings, most specific first
const CARD_SELECTORS: &[&str] = &[
    ".exhibitor-item",
    ".exhibitor-card",
    ".exhibitor",
    ".vendor-item",
    ".vendor",
    "[class*='exhibitor-']",
    "[class*='vendor-']",
    "[id*='exhibitor']",
    "[class*='exhibitor']",
    "[class*='vendor']",
];

const NAME_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, .name, [class*='name'], strong";

/// Listing pages built from exhibitor/vendor cards (Affiliate Summit, GoExpo)
pub struct ListingAdapter {
    page_type: PageType,
}

impl ListingAdapter {
    pub fn new(page_type: PageType) -> Self {
        Self { page_type }
    }
}

impl ExtractionAdapter for ListingAdapter {
    fn page_type(&self) -> PageType {
        self.page_type
    }

    fn extract(&self, page: &PageSnapshot) -> Vec<ExhibitorRecord> {
        let doc = page.document();
        let root = doc.root_element();
        let filter = page.link_filter();

        for css in CARD_SELECTORS {
            let cards = outermost(select_all(root, css));
            if cards.is_empty() {
                continue;
            }

            let mut seen = SeenKeys::new();
            let records: Vec<ExhibitorRecord> = cards
                .into_iter()
                .filter_map(|card| {
                    let name = first_text(card, NAME_SELECTOR).or_else(|| first_line(card))?;
                    let record = ExhibitorRecord::new(&name, self.page_type)?;
                    Some(record.with_website(first_website(card, &filter)))
                })
                .filter(|record| seen.insert(&[&record.company_name]))
                .collect();

            if !records.is_empty() {
                ::log::debug!("{}: {} cards via {}", self.page_type, records.len(), css);
                return records;
            }
        }

        ::log::debug!("{}: no exhibitor cards found", self.page_type);
        Vec::new()
    }
}
