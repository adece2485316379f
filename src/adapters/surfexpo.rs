use super::{ExtractionAdapter, PageSnapshot, PageType, select_all, select_first};
use crate::results::ExhibitorRecord;
use crate::utils::{SeenKeys, element_text, split_lines};
use scraper::ElementRef;

/// Bold text inside a heading marks a category
const CATEGORY_HEADER_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

pub struct SurfExpoAdapter;

impl ExtractionAdapter for SurfExpoAdapter {
    fn page_type(&self) -> PageType {
        PageType::SurfExpo
    }

    fn extract(&self, page: &PageSnapshot) -> Vec<ExhibitorRecord> {
        let doc = page.document();
        let root = doc.root_element();

        let mut groups = category_groups(root);
        if groups.is_empty() {
            ::log::debug!("surfexpo: no category headers, scanning paragraphs");
            groups = paragraph_groups(root);
        }

        let mut seen = SeenKeys::new();
        let mut records = Vec::new();
        for (category, names) in groups {
            let category_key = category.clone().unwrap_or_default();
            for name in names {
                let Some(record) = ExhibitorRecord::new(&name, PageType::SurfExpo) else {
                    continue;
                };
                if seen.insert(&[&category_key, &record.company_name]) {
                    records.push(record.with_category(category.clone()));
                }
            }
        }
        records
    }
}

type Group = (Option<String>, Vec<String>);

/// Walk headings with bold text; the next sibling paragraph lists companies
fn category_groups(root: ElementRef<'_>) -> Vec<Group> {
    select_all(root, CATEGORY_HEADER_SELECTOR)
        .into_iter()
        .filter_map(|heading| {
            let category = select_first(heading, "b, strong").map(element_text)?;
            if category.is_empty() {
                return None;
            }
            let list = heading
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .next()
                .filter(|el| el.value().name() == "p")?;
            let names = split_lines(&list.inner_html());
            (!names.is_empty()).then_some((Some(category), names))
        })
        .collect()
}

/// Whole-document pass over paragraphs
///
/// A paragraph that is only bold text starts a category. A paragraph with
/// line breaks lists companies, optionally led by its own bold category.
fn paragraph_groups(root: ElementRef<'_>) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut current: Option<String> = None;

    for paragraph in select_all(root, "p") {
        let html = paragraph.inner_html();
        let bold = select_first(paragraph, "b, strong").map(element_text);
        let mut lines = split_lines(&html);

        if !html.to_lowercase().contains("<br") {
            if bold.is_some() && bold.as_deref() == Some(element_text(paragraph).as_str()) {
                current = bold;
            }
            continue;
        }

        if bold.is_some() && lines.first() == bold.as_ref() {
            current = bold;
            lines.remove(0);
        }
        if !lines.is_empty() {
            groups.push((current.clone(), lines));
        }
    }
    groups
}
