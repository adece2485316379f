use super::{
    ExtractionAdapter, PageSnapshot, PageType, first_line, first_text, first_website, outermost,
    select_all,
};
use crate::results::ExhibitorRecord;
use crate::utils::{SeenKeys, element_text};

/// Booth table rows carry the booth id as an attribute
const BOOTH_ROW_SELECTOR: &str = "tr[data-boothid]";

const NAME_SELECTOR: &str = "a.exhibitorName, .exhibitorName, .companyName";

const BOOTH_LABEL_SELECTOR: &str = ".boothLabel, td.boothLabel, [class*='booth']";

/// Containers used by list layouts without a booth table
const FALLBACK_ITEM_SELECTOR: &str = "li.listItem, [class*='exhibitorItem'], [class*='exhibitor-item']";

const FALLBACK_NAME_SELECTOR: &str = ".exhibitorName, .companyName, h3, h4, a";

pub struct A2zAdapter;

impl ExtractionAdapter for A2zAdapter {
    fn page_type(&self) -> PageType {
        PageType::A2z
    }

    fn extract(&self, page: &PageSnapshot) -> Vec<ExhibitorRecord> {
        let doc = page.document();
        let root = doc.root_element();

        let rows = select_all(root, BOOTH_ROW_SELECTOR);
        if !rows.is_empty() {
            ::log::debug!("a2z: booth table with {} rows", rows.len());
            let mut seen = SeenKeys::new();
            let mut records = Vec::new();

            for row in rows {
                let booth_id = row.value().attr("data-boothid").unwrap_or_default();
                let name = first_text(row, NAME_SELECTOR).or_else(|| {
                    select_all(row, "td")
                        .get(1)
                        .map(|cell| element_text(*cell))
                        .filter(|t| !t.is_empty())
                });
                let Some(record) = name.and_then(|n| ExhibitorRecord::new(&n, PageType::A2z))
                else {
                    ::log::trace!("a2z: booth row {} has no name", booth_id);
                    continue;
                };

                if !seen.insert(&[booth_id, &record.company_name]) {
                    continue;
                }

                let booth = row
                    .value()
                    .attr("data-boothlabel")
                    .map(str::to_string)
                    .or_else(|| first_text(row, BOOTH_LABEL_SELECTOR));

                // Booth tables never carry a website
                records.push(record.with_booth(booth));
            }
            return records;
        }

        ::log::debug!("a2z: no booth table, using list selectors");
        let filter = page.link_filter();
        let mut seen = SeenKeys::new();
        outermost(select_all(root, FALLBACK_ITEM_SELECTOR))
            .into_iter()
            .filter_map(|item| {
                let name = first_text(item, FALLBACK_NAME_SELECTOR).or_else(|| first_line(item))?;
                let record = ExhibitorRecord::new(&name, PageType::A2z)?;
                Some(record.with_website(first_website(item, &filter)))
            })
            .filter(|record| seen.insert(&[&record.company_name]))
            .collect()
    }
}
