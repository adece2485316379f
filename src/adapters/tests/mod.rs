mod classifier_tests;
mod template_tests;

use super::{PageSnapshot, PageType, adapter_for};
use crate::results::ExhibitorRecord;
use url::Url;

/// Run the adapter for `page_type` over an HTML fixture served from `url`
pub(crate) fn extract(page_type: PageType, url: &str, html: &str) -> Vec<ExhibitorRecord> {
    let page = PageSnapshot::new(Url::parse(url).unwrap(), html);
    adapter_for(page_type).extract(&page)
}

pub(crate) fn names(records: &[ExhibitorRecord]) -> Vec<&str> {
    records.iter().map(|r| r.company_name.as_str()).collect()
}
