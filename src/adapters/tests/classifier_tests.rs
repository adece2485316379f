use crate::adapters::PageType;

#[test]
fn test_known_hosts() {
    let cases = [
        ("https://manifestvegas.com/attendees", PageType::Manifest),
        (
            "https://expo25.mapyourshow.com/8_0/explore/exhibitor-gallery.cfm",
            PageType::MapYourShow,
        ),
        (
            "https://s23.a2zinc.net/clients/show/eventmap/eventportal/default.aspx",
            PageType::A2z,
        ),
        (
            "https://expo.smallworldlabs.com/exhibitors",
            PageType::SmallWorldLabs,
        ),
        (
            "https://www.affiliatesummit.com/east/exhibitors",
            PageType::AffiliateSummit,
        ),
        ("https://www.goeshow.com/nsa/list", PageType::GoeShow),
        ("https://expo.wpma.org/floorplan", PageType::Wpma),
        ("https://www.surfexpo.com/exhibitor-list", PageType::SurfExpo),
    ];

    for (url, expected) in cases {
        assert_eq!(
            PageType::from_url(url),
            expected,
            "URL '{}' should be classified as {}",
            url,
            expected
        );
    }
}

#[test]
fn test_classification_is_case_insensitive() {
    assert_eq!(
        PageType::from_url("HTTPS://EXPO.SMALLWORLDLABS.COM/x"),
        PageType::SmallWorldLabs
    );
}

#[test]
fn test_unmatched_urls_are_generic() {
    for url in [
        "https://example.com/exhibitors",
        "",
        "not a url",
        "https://tradeshow.io/list?page=2",
    ] {
        assert_eq!(PageType::from_url(url), PageType::Generic);
        // Same input, same answer
        assert_eq!(PageType::from_url(url), PageType::from_url(url));
    }
}

#[test]
fn test_first_match_wins() {
    // Both hosts appear; the earlier table entry decides
    let url = "https://expo.mapyourshow.com/redirect?to=smallworldlabs.com";
    assert_eq!(PageType::from_url(url), PageType::MapYourShow);
}

#[test]
fn test_page_caps_and_default_pagination() {
    assert_eq!(PageType::SmallWorldLabs.page_cap(), 100);
    assert_eq!(PageType::Manifest.page_cap(), 20);
    assert_eq!(PageType::Generic.page_cap(), 5);
    assert_eq!(PageType::A2z.page_cap(), 5);
    assert!(PageType::SmallWorldLabs.paginates_by_default());
    assert!(!PageType::Generic.paginates_by_default());
}
