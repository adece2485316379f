//! Ranking of search results against a company name.

use super::search::SearchResult;
use crate::filter::{host_matches, is_platform_host, is_social_host};
use url::Url;

/// Reference and aggregator sites that are never a company's own site
pub const SEARCH_DENYLIST: &[&str] = &[
    "wikipedia.org",
    "crunchbase.com",
    "bloomberg.com",
    "google.com",
];

/// Lowest score accepted without falling back to the first result
pub const MIN_SCORE: i32 = 5;

const DOMAIN_TOKEN_POINTS: i32 = 10;
const TITLE_TOKEN_POINTS: i32 = 5;
const SNIPPET_TOKEN_POINTS: i32 = 2;
const COMMON_TLD_POINTS: i32 = 3;
const OFFICIAL_POINTS: i32 = 5;
const SUBDOMAIN_PENALTY: i32 = 2;
const DEEP_PATH_PENALTY: i32 = 1;

const COMMON_TLDS: &[&str] = &[".com", ".net", ".org"];
const OFFICIAL_MARKERS: &[&str] = &["official", "homepage"];

/// A scored search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionCandidate {
    pub url: String,
    pub score: i32,
    pub domain: String,
}

/// Lowercased words of the company name longer than two characters
pub fn name_tokens(name: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in name
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|t| t.chars().count() > 2)
    {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Whether a domain belongs to a site that is never a company's own
pub fn is_denied(domain: &str) -> bool {
    is_social_host(domain)
        || is_platform_host(domain)
        || SEARCH_DENYLIST.iter().any(|d| host_matches(domain, d))
}

/// Score one result; `None` if its URL has no host
pub fn score(result: &SearchResult, tokens: &[String]) -> Option<ResolutionCandidate> {
    let url = Url::parse(&result.url).ok()?;
    let domain = result.domain()?;
    let title = result.title.to_lowercase();
    let snippet = result.snippet.to_lowercase();

    let mut score = 0;
    for token in tokens {
        if domain.contains(token.as_str()) {
            score += DOMAIN_TOKEN_POINTS;
        }
        if title.contains(token.as_str()) {
            score += TITLE_TOKEN_POINTS;
        }
        if snippet.contains(token.as_str()) {
            score += SNIPPET_TOKEN_POINTS;
        }
    }

    if COMMON_TLDS.iter().any(|tld| domain.ends_with(tld)) {
        score += COMMON_TLD_POINTS;
    }
    if has_subdomain(&domain) {
        score -= SUBDOMAIN_PENALTY;
    }
    if path_depth(&url) > 4 {
        score -= DEEP_PATH_PENALTY;
    }
    if OFFICIAL_MARKERS
        .iter()
        .any(|m| title.contains(m) || snippet.contains(m))
    {
        score += OFFICIAL_POINTS;
    }

    Some(ResolutionCandidate {
        url: site_root(&url),
        score,
        domain,
    })
}

/// Pick a website from ranked search results
///
/// The best candidate wins if it reaches `MIN_SCORE`. Otherwise the first
/// result that is not on the denylist is taken as is.
pub fn select(name: &str, results: &[SearchResult]) -> Option<String> {
    let tokens = name_tokens(name);
    let allowed: Vec<&SearchResult> = results
        .iter()
        .filter(|r| r.domain().is_some_and(|d| !is_denied(&d)))
        .collect();

    let mut best: Option<ResolutionCandidate> = None;
    for candidate in allowed.iter().filter_map(|r| score(r, &tokens)) {
        ::log::trace!("Candidate {} scored {}", candidate.domain, candidate.score);
        if best.as_ref().is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    match best {
        Some(best) if best.score >= MIN_SCORE => Some(best.url),
        _ => allowed.first().and_then(|r| Url::parse(&r.url).ok()).map(|u| site_root(&u)),
    }
}

/// A non-`www` label in front of the registrable name
fn has_subdomain(domain: &str) -> bool {
    domain.trim_start_matches("www.").split('.').count() > 2
}

fn path_depth(url: &Url) -> usize {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).count())
        .unwrap_or(0)
}

/// `scheme://host[:port]` of a result
fn site_root(url: &Url) -> String {
    url.origin().ascii_serialization()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(name: &str) -> Vec<String> {
        name_tokens(name)
    }

    #[test]
    fn test_name_tokens() {
        assert_eq!(tokens("Acme Corp"), vec!["acme", "corp"]);
        assert_eq!(tokens("The A&B Co. of America"), vec!["the", "america"]);
        assert!(tokens("A B").is_empty());
    }

    #[test]
    fn test_official_result_beats_fan_subdomain() {
        let official = SearchResult::new("https://acme.com/").with_title("Acme Corp - Official Site");
        let fandom = SearchResult::new("https://acme.fandom.com/wiki/Acme");

        let t = tokens("Acme Corp");
        let a = score(&official, &t).unwrap();
        let b = score(&fandom, &t).unwrap();
        assert!(a.score > b.score, "{} vs {}", a.score, b.score);
        assert_eq!(a.domain, "acme.com");

        assert_eq!(
            select("Acme Corp", &[official, fandom]),
            Some("https://acme.com".to_string())
        );
    }

    #[test]
    fn test_score_components() {
        let t = tokens("Acme Corp");
        // 10 (acme in domain) + 3 (.com)
        let plain = SearchResult::new("https://acme.com");
        assert_eq!(score(&plain, &t).unwrap().score, 13);

        // Subdomain and deep path penalties
        let deep = SearchResult::new("https://shop.acme.com/a/b/c/d/e");
        assert_eq!(score(&deep, &t).unwrap().score, 13 - 2 - 1);

        // www is not a subdomain
        let www = SearchResult::new("https://www.acme.com");
        assert_eq!(score(&www, &t).unwrap().score, 13);

        let snippet = SearchResult::new("https://example.org").with_snippet("Acme homepage");
        assert_eq!(score(&snippet, &t).unwrap().score, 2 + 3 + 5);
    }

    #[test]
    fn test_domain_token_never_lowers_score() {
        let t = tokens("Acme Widget Corp");
        let pairs = [
            ("https://widget.io", "https://acmewidget.io"),
            ("https://example.com", "https://acme.com"),
            ("https://blog.example.net/x/y/z/w/v", "https://blog.acmecorp.net/x/y/z/w/v"),
        ];
        for (without, with) in pairs {
            let base = SearchResult::new(without).with_title("Widgets");
            let better = SearchResult::new(with).with_title("Widgets");
            assert!(
                score(&better, &t).unwrap().score >= score(&base, &t).unwrap().score,
                "{} vs {}",
                with,
                without
            );
        }
    }

    #[test]
    fn test_denylisted_results_are_skipped() {
        let results = [
            SearchResult::new("https://en.wikipedia.org/wiki/Acme_Corp").with_title("Acme Corp"),
            SearchResult::new("https://www.linkedin.com/company/acme").with_title("Acme Corp"),
            SearchResult::new("https://acmecorp.net/about"),
        ];
        assert_eq!(
            select("Acme Corp", &results),
            Some("https://acmecorp.net".to_string())
        );
    }

    #[test]
    fn test_low_scores_fall_back_to_first_allowed() {
        let results = [
            SearchResult::new("https://www.facebook.com/acme"),
            SearchResult::new("https://directory.example.de/list"),
            SearchResult::new("https://other.example.de/"),
        ];
        assert_eq!(
            select("Zzyzx Holdings", &results),
            Some("https://directory.example.de".to_string())
        );
    }

    #[test]
    fn test_nothing_allowed_selects_nothing() {
        let results = [SearchResult::new("https://twitter.com/acme")];
        assert_eq!(select("Acme Corp", &results), None);
        assert_eq!(select("Acme Corp", &[]), None);
    }
}
