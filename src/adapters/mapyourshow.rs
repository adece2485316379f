use super::{
    ExtractionAdapter, PageSnapshot, PageType, first_line, first_text, first_website, outermost,
    select_all,
};
use crate::results::ExhibitorRecord;
use crate::utils::SeenKeys;

/// Exhibitor containers across MapYourShow releases, newest first
const ITEM_SELECTORS: &[&str] = &[
    "li.js-Exhibitor",
    ".exhibitor-item",
    ".exhibitor-card",
    "[class*='exhibitor-result']",
    "table.exhibitorList tbody tr",
    "[class*='exhibitor'] li",
];

const NAME_SELECTOR: &str = "h2, h3, h4, .exhibitor-name, .card-Title, [class*='name']";

const BOOTH_SELECTOR: &str = ".booth, [class*='booth']";

pub struct MapYourShowAdapter;

impl ExtractionAdapter for MapYourShowAdapter {
    fn page_type(&self) -> PageType {
        PageType::MapYourShow
    }

    fn extract(&self, page: &PageSnapshot) -> Vec<ExhibitorRecord> {
        let doc = page.document();
        let root = doc.root_element();
        let filter = page.link_filter();

        let Some((css, items)) = ITEM_SELECTORS
            .iter()
            .map(|css| (css, outermost(select_all(root, css))))
            .find(|(_, items)| !items.is_empty())
        else {
            ::log::debug!("mapyourshow: no exhibitor containers matched");
            return Vec::new();
        };
        ::log::debug!("mapyourshow: {} items via {}", items.len(), css);

        let mut seen = SeenKeys::new();
        let mut records = Vec::new();
        for item in items {
            let name = first_text(item, NAME_SELECTOR)
                .or_else(|| item.value().attr("title").map(str::to_string))
                .or_else(|| first_line(item));
            let Some(record) = name.and_then(|n| ExhibitorRecord::new(&n, PageType::MapYourShow))
            else {
                ::log::trace!("mapyourshow: skipped item without a usable name");
                continue;
            };

            if !seen.insert(&[&record.company_name]) {
                continue;
            }

            records.push(
                record
                    .with_website(first_website(item, &filter))
                    .with_booth(first_text(item, BOOTH_SELECTOR).map(strip_booth_label)),
            );
        }
        records
    }
}

/// "Booth: 1234" -> "1234"
fn strip_booth_label(text: String) -> String {
    let trimmed = text.trim();
    let lower = trimmed.to_ascii_lowercase();
    match lower.strip_prefix("booth") {
        Some(rest) => trimmed[trimmed.len() - rest.len()..]
            .trim_start_matches([':', '#', ' '])
            .to_string(),
        None => trimmed.to_string(),
    }
}
