use super::{extract, names};
use crate::adapters::PageType;

#[cfg(test)]
mod smallworldlabs_tests {
    use super::*;

    const URL: &str = "https://expo.smallworldlabs.com/exhibitors";

    #[test]
    fn test_table_rows_with_booths() {
        let html = r#"
            <table>
              <tr><th>#</th><th>Name</th><th>Booth</th></tr>
              <tr><td>1</td><td><a class="generic-option-link" href="/profile/1">Acme Co</a></td><td>B101</td></tr>
              <tr><td>2</td><td><a class="generic-option-link" href="/profile/2">Beta LLC</a></td><td>B102</td></tr>
            </table>"#;

        let records = extract(PageType::SmallWorldLabs, URL, html);
        assert_eq!(names(&records), vec!["Acme Co", "Beta LLC"]);
        assert_eq!(records[0].booth.as_deref(), Some("B101"));
        assert_eq!(records[1].booth.as_deref(), Some("B102"));
        assert!(records.iter().all(|r| r.website.is_empty()));
        assert!(records.iter().all(|r| r.source == PageType::SmallWorldLabs));
    }

    #[test]
    fn test_placeholder_rows_rejected() {
        let html = r#"
            <table>
              <tr><td>0</td><td>Name</td><td>Booth</td></tr>
              <tr><td>1</td><td>Booth #14</td><td>14</td></tr>
              <tr><td>2</td><td>Explore</td><td></td></tr>
              <tr><td>3</td><td>42</td><td></td></tr>
              <tr><td>only one cell</td></tr>
              <tr><td>4</td><td>Gamma Inc</td><td>C1</td></tr>
            </table>"#;

        let records = extract(PageType::SmallWorldLabs, URL, html);
        assert_eq!(names(&records), vec!["Gamma Inc"]);
    }

    #[test]
    fn test_row_website_skips_platform_and_booth_map() {
        let html = r#"
            <table>
              <tr>
                <td>1</td>
                <td><a class="generic-option-link" href="/profile/1">Acme Co</a></td>
                <td><a href="https://app.expofp.com/booth/9">B9</a></td>
                <td><a href="https://acme.com">acme.com</a></td>
              </tr>
            </table>"#;

        let records = extract(PageType::SmallWorldLabs, URL, html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].website, "https://acme.com/");
        assert_eq!(records[0].booth.as_deref(), Some("B9"));
    }
}

#[cfg(test)]
mod manifest_tests {
    use super::*;

    const URL: &str = "https://manifestvegas.com/attendees";

    #[test]
    fn test_primary_list_drops_range_headers() {
        let html = r#"<div class="company-list">Acme Co<br>Beta LLC<br>A - F</div>"#;
        let records = extract(PageType::Manifest, URL, html);
        assert_eq!(names(&records), vec!["Acme Co", "Beta LLC"]);
    }

    #[test]
    fn test_text_block_fallback() {
        let html = r#"
            <div class="entry-content">
              <p>Companies Who Attend Include:<br>Acme Co<br>acme co<br>123<br>Gamma Inc</p>
              <p>No line breaks in this paragraph</p>
            </div>"#;
        let records = extract(PageType::Manifest, URL, html);
        assert_eq!(names(&records), vec!["Acme Co", "Gamma Inc"]);
    }

    #[test]
    fn test_body_text_fallback_skips_scripts() {
        let html = r#"<body><div>Acme Co</div><div>G - M</div><script>var x = 1;</script><div>Delta Corp</div></body>"#;
        let records = extract(PageType::Manifest, URL, html);
        assert_eq!(names(&records), vec!["Acme Co", "Delta Corp"]);
    }
}

#[cfg(test)]
mod mapyourshow_tests {
    use super::*;

    const URL: &str = "https://expo.mapyourshow.com/8_0/explore/exhibitor-gallery.cfm";

    #[test]
    fn test_cards_with_websites() {
        let html = r#"
            <ul>
              <li class="js-Exhibitor">
                <h3>Acme Co</h3>
                <span class="booth">Booth: 1234</span>
                <a href="/8_0/exhibitor/exhibitor-details.cfm?exhid=1">Details</a>
                <a href="https://www.facebook.com/acme">Facebook</a>
                <a href="https://www.acme.com">Visit Website</a>
              </li>
              <li class="js-Exhibitor" title="Beta LLC"><a href="https://beta.io">beta.io</a></li>
              <li class="js-Exhibitor"><h3>ACME CO</h3></li>
            </ul>"#;

        let records = extract(PageType::MapYourShow, URL, html);
        assert_eq!(names(&records), vec!["Acme Co", "Beta LLC"]);
        assert_eq!(records[0].website, "https://www.acme.com/");
        assert_eq!(records[0].booth.as_deref(), Some("1234"));
        assert_eq!(records[1].website, "https://beta.io/");
    }

    #[test]
    fn test_later_selector_used_when_earlier_miss() {
        let html = r#"<div class="exhibitor-card"><h4>Gamma Inc</h4></div>"#;
        let records = extract(PageType::MapYourShow, URL, html);
        assert_eq!(names(&records), vec!["Gamma Inc"]);
    }
}

#[cfg(test)]
mod a2z_tests {
    use super::*;

    const URL: &str = "https://s23.a2zinc.net/clients/show/eventmap/eventportal/default.aspx";

    #[test]
    fn test_booth_table() {
        let html = r#"
            <table>
              <tr data-boothid="11" data-boothlabel="101">
                <td><a class="exhibitorName" href="https://acme.com">Acme Co</a></td><td>101</td>
              </tr>
              <tr data-boothid="11"><td><a class="exhibitorName">acme co</a></td></tr>
              <tr data-boothid="12"><td>x</td><td>Beta LLC</td><td class="boothLabel">202</td></tr>
            </table>"#;

        let records = extract(PageType::A2z, URL, html);
        assert_eq!(names(&records), vec!["Acme Co", "Beta LLC"]);
        assert_eq!(records[0].booth.as_deref(), Some("101"));
        assert_eq!(records[1].booth.as_deref(), Some("202"));
        // Booth tables never yield websites, even when a link is present
        assert!(records.iter().all(|r| r.website.is_empty()));
    }

    #[test]
    fn test_list_fallback_excludes_platform_links() {
        let html = r#"
            <ul>
              <li class="listItem">
                <span class="companyName">Gamma Inc</span>
                <a href="https://s23.a2zinc.net/clients/x">Profile</a>
                <a href="https://gamma.com">gamma.com</a>
              </li>
            </ul>"#;

        let records = extract(PageType::A2z, URL, html);
        assert_eq!(names(&records), vec!["Gamma Inc"]);
        assert_eq!(records[0].website, "https://gamma.com/");
    }
}

#[cfg(test)]
mod listing_tests {
    use super::*;

    #[test]
    fn test_affiliatesummit_cards() {
        let html = r#"
            <div class="exhibitor-list">
              <div class="exhibitor-item"><h4>Acme Co</h4><a href="https://acme.com">Website</a></div>
              <div class="exhibitor-item"><h4>Beta LLC</h4><a href="https://twitter.com/beta">Twitter</a></div>
            </div>"#;

        let records = extract(
            PageType::AffiliateSummit,
            "https://www.affiliatesummit.com/east/exhibitors",
            html,
        );
        assert_eq!(names(&records), vec!["Acme Co", "Beta LLC"]);
        assert_eq!(records[0].website, "https://acme.com/");
        assert_eq!(records[1].website, "");
        assert_eq!(records[0].source, PageType::AffiliateSummit);
    }

    #[test]
    fn test_goeshow_vendor_rows() {
        let html = r#"
            <table>
              <tr class="vendor"><td><strong>Gamma Inc</strong></td><td><a href="http://gamma.net">http://gamma.net</a></td></tr>
            </table>"#;

        let records = extract(PageType::GoeShow, "https://www.goeshow.com/nsa/list", html);
        assert_eq!(names(&records), vec!["Gamma Inc"]);
        assert_eq!(records[0].website, "http://gamma.net/");
        assert_eq!(records[0].source, PageType::GoeShow);
    }
}

#[cfg(test)]
mod wpma_tests {
    use super::*;

    #[test]
    fn test_floor_plan_booths() {
        let html = r#"
            <div id="booth_1" class="booth type-manufacturer type-pest-control" title="Booth #M101" data-value="101"
                 data-tooltip="&lt;b&gt;Acme Pest&lt;/b&gt;&lt;br&gt;&lt;i&gt;Seattle, WA&lt;/i&gt;&lt;br&gt;Description: Termites"></div>
            <div id="booth_2" class="booth" data-value="102" data-tooltip="Hold"></div>
            <div id="booth_3" class="booth" data-value="103"><div class="tooltip">Beta Supply<br>Portland, OR</div></div>
            <div id="booth_4" class="booth" data-value="104"></div>"#;

        let records = extract(PageType::Wpma, "https://expo.wpma.org/floorplan", html);
        assert_eq!(names(&records), vec!["Acme Pest", "Beta Supply"]);

        let acme = &records[0];
        assert_eq!(acme.booth.as_deref(), Some("M101"));
        assert_eq!(acme.location.as_deref(), Some("Seattle, WA"));
        assert_eq!(acme.description.as_deref(), Some("Termites"));
        assert_eq!(acme.business_types, vec!["manufacturer", "pest control"]);
        assert!(acme.website.is_empty());

        let beta = &records[1];
        assert_eq!(beta.booth.as_deref(), Some("103"));
        assert_eq!(beta.location.as_deref(), Some("Portland, OR"));
    }
}

#[cfg(test)]
mod surfexpo_tests {
    use super::*;

    const URL: &str = "https://www.surfexpo.com/exhibitor-list";

    #[test]
    fn test_category_headers() {
        let html = r#"
            <h3><strong>Apparel</strong></h3>
            <p>Acme Surf<br>Beta Boards<br>acme surf</p>
            <h3><strong>Hardgoods</strong></h3>
            <p>Acme Surf<br>Gamma Fins</p>"#;

        let records = extract(PageType::SurfExpo, URL, html);
        assert_eq!(
            names(&records),
            vec!["Acme Surf", "Beta Boards", "Acme Surf", "Gamma Fins"]
        );
        assert_eq!(records[0].category.as_deref(), Some("Apparel"));
        assert_eq!(records[3].category.as_deref(), Some("Hardgoods"));
        assert!(records.iter().all(|r| r.website.is_empty()));
    }

    #[test]
    fn test_paragraph_fallback() {
        let html = r#"
            <p><strong>Footwear</strong></p>
            <p>Delta Shoes<br>Echo Sandals</p>
            <p><b>Eyewear</b><br>Foxtrot Shades</p>"#;

        let records = extract(PageType::SurfExpo, URL, html);
        assert_eq!(
            names(&records),
            vec!["Delta Shoes", "Echo Sandals", "Foxtrot Shades"]
        );
        assert_eq!(records[0].category.as_deref(), Some("Footwear"));
        assert_eq!(records[2].category.as_deref(), Some("Eyewear"));
    }
}

#[cfg(test)]
mod generic_tests {
    use super::*;

    const URL: &str = "https://example.com/exhibitors";

    #[test]
    fn test_containers_dedupe_case_insensitively() {
        let html = r#"
            <div class="exhibitor"><h3>Acme Inc</h3><a href="https://acme.com">acme.com</a></div>
            <div class="exhibitor"><h3>ACME INC</h3></div>
            <div class="exhibitor"><h3>View</h3></div>
            <div class="exhibitor">
              <h3>Beta LLC</h3>
              <a href="https://linkedin.com/company/beta">LinkedIn</a>
              <a href="https://beta.xyz">Site</a>
            </div>"#;

        let records = extract(PageType::Generic, URL, html);
        assert_eq!(names(&records), vec!["Acme Inc", "Beta LLC"]);
        assert_eq!(records[0].website, "https://acme.com/");
        assert_eq!(records[1].website, "");
    }

    #[test]
    fn test_row_fallback() {
        let html = r#"
            <ul>
              <li>Login</li>
              <li>Gamma Co <a href="https://gamma.org">Site</a></li>
              <li><a href="/about">»</a></li>
            </ul>"#;

        let records = extract(PageType::Generic, URL, html);
        assert_eq!(names(&records), vec!["Gamma Co"]);
        assert_eq!(records[0].website, "https://gamma.org/");
    }

    #[test]
    fn test_empty_page() {
        assert!(extract(PageType::Generic, URL, "<html><body></body></html>").is_empty());
    }
}
