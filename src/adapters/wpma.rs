use super::{ExtractionAdapter, PageSnapshot, PageType, select_all, select_first};
use crate::results::ExhibitorRecord;
use crate::utils::{SeenKeys, element_text, split_lines, strip_tags};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

/// Floor-plan booths are keyed by element id
const BOOTH_SELECTOR: &str = "[id^='booth_'], [id^='booth-']";

/// Class prefix that tags a booth with a business type
const BUSINESS_TYPE_PREFIX: &str = "type-";

/// Booth labels on the floor plan that are not exhibitors
const PLACEHOLDER_NAMES: &[&str] = &[
    "hold",
    "beer garden",
    "available",
    "reserved",
    "food court",
    "lounge",
    "registration",
    "storage",
    "restrooms",
    "stage",
];

static BOOTH_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Booth\s*#\s*(M\d+)").expect("booth number"));

static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Description:\s*(.+?)(?:<br\s*/?>|</p>|</div>|$)").expect("description")
});

pub struct WpmaAdapter;

impl ExtractionAdapter for WpmaAdapter {
    fn page_type(&self) -> PageType {
        PageType::Wpma
    }

    fn extract(&self, page: &PageSnapshot) -> Vec<ExhibitorRecord> {
        let doc = page.document();
        let mut seen = SeenKeys::new();
        let mut records = Vec::new();

        for booth in select_all(doc.root_element(), BOOTH_SELECTOR) {
            let Some(record) = parse_booth(booth) else {
                continue;
            };
            let booth_no = record.booth.clone().unwrap_or_default();
            if seen.insert(&[&booth_no, &record.company_name]) {
                records.push(record);
            }
        }

        ::log::debug!("wpma: {} booths extracted", records.len());
        records
    }
}

/// Turn one booth element into a record. No website exists in this template.
fn parse_booth(booth: ElementRef<'_>) -> Option<ExhibitorRecord> {
    let element = booth.value();

    let booth_number = element
        .attr("title")
        .and_then(|title| BOOTH_NUMBER.captures(title))
        .map(|caps| caps[1].to_string())
        .or_else(|| element.attr("data-value").map(str::to_string));

    let tooltip = tooltip_html(booth)?;
    let fields = TooltipFields::parse(&tooltip);
    let name = fields.name?;

    if is_placeholder(&name) {
        ::log::trace!("wpma: skipping placeholder booth {:?}", name);
        return None;
    }

    let mut business_types: Vec<String> = element
        .classes()
        .filter_map(|class| class.strip_prefix(BUSINESS_TYPE_PREFIX))
        .filter(|suffix| !suffix.is_empty())
        .map(|suffix| suffix.replace(['-', '_'], " "))
        .collect();
    business_types.sort();
    business_types.dedup();

    Some(
        ExhibitorRecord::new(&name, PageType::Wpma)?
            .with_booth(booth_number)
            .with_location(fields.location)
            .with_description(fields.description)
            .with_business_types(business_types),
    )
}

/// Tooltip markup is stored in an attribute or a hidden child element
fn tooltip_html(booth: ElementRef<'_>) -> Option<String> {
    let element = booth.value();
    element
        .attr("data-tooltip")
        .or_else(|| element.attr("data-content"))
        .map(str::to_string)
        .or_else(|| select_first(booth, ".tooltip, .booth-tooltip").map(|t| t.inner_html()))
        .filter(|html| !html.trim().is_empty())
}

#[derive(Debug, Default, PartialEq)]
struct TooltipFields {
    name: Option<String>,
    location: Option<String>,
    description: Option<String>,
}

impl TooltipFields {
    /// Name comes from bold text, location from italic text, with a
    /// line-by-line reading when the markup has no emphasis
    fn parse(fragment: &str) -> Self {
        let description = DESCRIPTION
            .captures(fragment)
            .map(|caps| strip_tags(&caps[1]))
            .filter(|d| !d.is_empty());

        let (mut name, mut location) = {
            let doc = Html::parse_fragment(fragment);
            let root = doc.root_element();
            (
                select_first(root, "b, strong").map(element_text),
                select_first(root, "i, em").map(element_text),
            )
        };

        if name.as_deref().is_none_or(str::is_empty) {
            let lines: Vec<String> = split_lines(fragment)
                .into_iter()
                .filter(|l| !l.to_lowercase().starts_with("description"))
                .collect();
            name = lines.first().cloned();
            if location.is_none() {
                location = lines.get(1).cloned();
            }
        }

        Self {
            name: name.filter(|n| !n.is_empty()),
            location: location.filter(|l| !l.is_empty()),
            description,
        }
    }
}

fn is_placeholder(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    PLACEHOLDER_NAMES
        .iter()
        .any(|p| lower == *p || lower.starts_with(&format!("{} ", p)))
}
