use super::{ExtractionAdapter, PageSnapshot, PageType, select_all};
use crate::results::ExhibitorRecord;
use crate::utils::{SeenKeys, is_numeric_only, normalize_whitespace, split_lines, visible_text};
use regex::Regex;
use std::sync::LazyLock;

/// Blocks known to hold the attendee list, one name per line
const PRIMARY_SELECTOR: &str = ".company-list, .exhibitor-list, .attendee-list";

/// Rich-text blocks that may hold the list when the primary one is missing
const TEXT_BLOCK_SELECTOR: &str =
    ".elementor-widget-text-editor p, .elementor-text-editor, .entry-content p, article p";

/// Upper bound on lines read from the raw body text
const MAX_BODY_LINES: usize = 1000;

/// Alphabet dividers such as "A - F" or "G-M"
static RANGE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]\s*[-–—]\s*[A-Za-z0-9]$").expect("range header"));

static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(companies|exhibitors|attendees|brands)\b.*\b(attend|include|exhibit)").expect("section header")
});

pub struct ManifestAdapter;

impl ExtractionAdapter for ManifestAdapter {
    fn page_type(&self) -> PageType {
        PageType::Manifest
    }

    fn extract(&self, page: &PageSnapshot) -> Vec<ExhibitorRecord> {
        let doc = page.document();
        let root = doc.root_element();

        let mut lines: Vec<String> = select_all(root, PRIMARY_SELECTOR)
            .into_iter()
            .flat_map(|block| split_lines(&block.inner_html()))
            .collect();

        if lines.is_empty() {
            ::log::debug!("manifest: primary list missing, trying text blocks");
            lines = select_all(root, TEXT_BLOCK_SELECTOR)
                .into_iter()
                .map(|block| block.inner_html())
                .filter(|html| html.to_lowercase().contains("<br"))
                .flat_map(|html| split_lines(&html))
                .collect();
        }

        if lines.is_empty() {
            ::log::debug!("manifest: no list blocks, splitting body text");
            lines = select_all(root, "body")
                .into_iter()
                .flat_map(|body| {
                    visible_text(body)
                        .into_iter()
                        .flat_map(|t| t.lines().map(normalize_whitespace).collect::<Vec<_>>())
                        .filter(|l| !l.is_empty())
                        .collect::<Vec<_>>()
                })
                .take(MAX_BODY_LINES)
                .collect();
        }

        let mut seen = SeenKeys::new();
        lines
            .iter()
            .filter(|line| is_company_line(line))
            .filter_map(|line| ExhibitorRecord::new(line, PageType::Manifest))
            .filter(|record| seen.insert(&[&record.company_name]))
            .collect()
    }
}

/// Whether a list line names a company rather than a divider or heading
pub fn is_company_line(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || is_numeric_only(line) {
        return false;
    }
    if RANGE_HEADER.is_match(line) || SECTION_HEADER.is_match(line) {
        return false;
    }
    // Single-letter alphabet anchors and "Include:" style headings
    if line.chars().count() == 1 || line.ends_with(':') {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lines_rejected() {
        assert!(!is_company_line("A - F"));
        assert!(!is_company_line("G-M"));
        assert!(!is_company_line("Companies Who Attend Include:"));
        assert!(!is_company_line("2024"));
        assert!(!is_company_line("B"));
        assert!(is_company_line("Acme Co"));
        assert!(is_company_line("3M"));
    }
}
