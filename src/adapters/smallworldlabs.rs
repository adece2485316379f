use super::{ExtractionAdapter, PageSnapshot, PageType, first_text, first_website, select_all};
use crate::results::ExhibitorRecord;
use crate::utils::{SeenKeys, element_text, is_numeric_only};
use regex::Regex;
use std::sync::LazyLock;

/// Booth map provider linked from every row
pub const BOOTH_MAP_DOMAIN: &str = "expofp.com";

/// Link class used for the company profile in the name cell
const NAME_LINK_SELECTOR: &str = "a.generic-option-link";

static BOOTH_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^booth\s*#\s*\d+$").expect("booth placeholder"));

pub struct SmallWorldLabsAdapter;

impl ExtractionAdapter for SmallWorldLabsAdapter {
    fn page_type(&self) -> PageType {
        PageType::SmallWorldLabs
    }

    fn extract(&self, page: &PageSnapshot) -> Vec<ExhibitorRecord> {
        let doc = page.document();
        let filter = page.link_filter().excluding(BOOTH_MAP_DOMAIN);

        let mut seen = SeenKeys::new();
        let mut records = Vec::new();

        for row in select_all(doc.root_element(), "table tr") {
            let cells = select_all(row, "td");
            if cells.len() < 2 {
                continue;
            }

            let name = first_text(cells[1], NAME_LINK_SELECTOR)
                .unwrap_or_else(|| element_text(cells[1]));
            if !is_exhibitor_name(&name) {
                ::log::trace!("smallworldlabs: skipped row name {:?}", name);
                continue;
            }
            let Some(record) = ExhibitorRecord::new(&name, PageType::SmallWorldLabs) else {
                continue;
            };

            if !seen.insert(&[&record.company_name]) {
                continue;
            }

            let booth = cells.get(2).map(|cell| element_text(*cell));
            records.push(
                record
                    .with_booth(booth)
                    .with_website(first_website(row, &filter)),
            );
        }

        ::log::debug!("smallworldlabs: {} rows extracted", records.len());
        records
    }
}

/// Rejects header cells, booth placeholders and navigation text
pub fn is_exhibitor_name(name: &str) -> bool {
    let name = name.trim();
    !(name.is_empty()
        || is_numeric_only(name)
        || BOOTH_PLACEHOLDER.is_match(name)
        || name.eq_ignore_ascii_case("explore")
        || name.eq_ignore_ascii_case("name"))
}
