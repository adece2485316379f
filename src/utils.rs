use regex::Regex;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|\r?\n").expect("line break pattern"));

/// Collapse runs of whitespace into single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove markup from an HTML fragment, keeping its text
pub fn strip_tags(fragment: &str) -> String {
    if !fragment.contains('<') {
        return normalize_whitespace(&decode_basic_entities(fragment));
    }
    let doc = Html::parse_fragment(fragment);
    normalize_whitespace(&doc.root_element().text().collect::<String>())
}

fn decode_basic_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
}

/// Split an HTML fragment on `<br>` tags and newlines, returning the
/// non-empty text of each line
pub fn split_lines(fragment: &str) -> Vec<String> {
    LINE_BREAK
        .split(fragment)
        .map(strip_tags)
        .filter(|line| !line.is_empty())
        .collect()
}

/// All non-empty text nodes of an element, whitespace-normalized
pub fn text_lines(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(normalize_whitespace)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Text nodes under an element, skipping script and style content
pub fn visible_text(element: ElementRef<'_>) -> Vec<String> {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(ElementRef::wrap)?;
            match parent.value().name() {
                "script" | "style" | "noscript" | "template" => None,
                _ => Some(text.to_string()),
            }
        })
        .collect()
}

/// Full text of an element, whitespace-normalized
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// True when the text holds only digits (and separators)
pub fn is_numeric_only(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '.' | ',' | '#'))
        && trimmed.chars().any(|c| c.is_ascii_digit())
}

/// True when the text has no letters or digits at all
pub fn is_punctuation_only(text: &str) -> bool {
    !text.chars().any(char::is_alphanumeric)
}

/// Case-insensitive key used to drop duplicate records within one page pass
pub fn dedup_key(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| normalize_whitespace(p).to_lowercase())
        .collect::<Vec<_>>()
        .join("|")
}

/// Tracks dedup keys already emitted during one extraction pass
#[derive(Debug, Default)]
pub struct SeenKeys(HashSet<String>);

impl SeenKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a key is offered
    pub fn insert(&mut self, parts: &[&str]) -> bool {
        self.0.insert(dedup_key(parts))
    }
}

/// Sleep for `duration` unless cancelled first. Returns false on cancellation.
pub async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
