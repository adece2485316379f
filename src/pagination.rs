//! Drives multi-page directories: find the "next" control, click it, wait,
//! re-extract, until nothing new turns up or the template's page cap is hit.

use crate::adapters::{ExtractionAdapter, PageSnapshot, PageType, select_all};
use crate::browser::{self, ElementTarget, PageDriver};
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::results::ExhibitorRecord;
use crate::utils::{SeenKeys, element_text, sleep_or_cancel};
use scraper::ElementRef;
use tokio_util::sync::CancellationToken;

/// Elements that can act as pagination controls. Targets index into this
/// selector's matches, which is the same order the browser reports.
pub const CLICKABLE_SELECTOR: &str = "a, button";

/// Marks the page the pager currently shows
const ACTIVE_PAGE_SELECTOR: &str =
    ".pagination .active, li.active, [aria-current='page'], .current, .selected";

/// Content that must be back on screen after a SmallWorldLabs page change
const SMALLWORLDLABS_CONTENT_SELECTOR: &str = "table tr";

const NEXT_TEXTS: &[&str] = &["next", "next page", "next »", "next ›", "next >"];

const ARROW_TEXTS: &[&str] = &["›", "»", ">", ">>", "→", "⟩"];

const ARROW_ICON_HINTS: &[&str] = &["chevron-right", "angle-right", "arrow-right", "caret-right"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationPhase {
    Idle,
    Advancing,
    /// Terminal
    Exhausted,
}

/// Position of a paginated crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: usize,
    pub has_next: bool,
    pub page_cap: usize,
    pub phase: PaginationPhase,
}

impl PaginationState {
    pub fn new(page_type: PageType) -> Self {
        Self {
            current_page: 1,
            has_next: true,
            page_cap: page_type.page_cap(),
            phase: PaginationPhase::Idle,
        }
    }

    fn exhaust(&mut self) {
        self.has_next = false;
        self.phase = PaginationPhase::Exhausted;
    }
}

/// Pagination over one page handle with one adapter
pub struct Paginator<'a> {
    page: &'a dyn PageDriver,
    adapter: &'a dyn ExtractionAdapter,
    config: &'a ScraperConfig,
    cancel: &'a CancellationToken,
    state: PaginationState,
    known: SeenKeys,
}

impl<'a> Paginator<'a> {
    /// Start in `Idle` on page 1, remembering what page 1 already produced
    pub fn new(
        page: &'a dyn PageDriver,
        adapter: &'a dyn ExtractionAdapter,
        config: &'a ScraperConfig,
        cancel: &'a CancellationToken,
        first_page: &[ExhibitorRecord],
    ) -> Self {
        let mut known = SeenKeys::new();
        for record in first_page {
            known.insert(&record_key(record));
        }

        Self {
            page,
            adapter,
            config,
            cancel,
            state: PaginationState::new(adapter.page_type()),
            known,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Move to the next page and extract it
    ///
    /// Returns `Ok(None)` once exhausted: no next control, a click that did
    /// not take, a page with nothing new, a driver error, or the page cap.
    pub async fn advance(&mut self) -> Result<Option<Vec<ExhibitorRecord>>, ScrapeError> {
        if self.state.phase == PaginationPhase::Exhausted {
            return Ok(None);
        }
        if self.cancel.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }

        let page_type = self.adapter.page_type();
        if self.state.current_page >= self.state.page_cap {
            ::log::info!(
                "{}: page cap {} reached, stopping pagination",
                page_type,
                self.state.page_cap
            );
            self.state.exhaust();
            return Ok(None);
        }

        self.state.phase = PaginationPhase::Advancing;
        let target_page = self.state.current_page + 1;

        let targets = match browser::snapshot(self.page).await {
            Ok(snap) => next_controls(page_type, &snap, target_page),
            Err(e) => {
                ::log::warn!("{}: could not read page for pagination: {}", page_type, e);
                self.state.exhaust();
                return Ok(None);
            }
        };

        if !self.click_first(&targets).await {
            ::log::info!(
                "{}: no usable next control after page {}",
                page_type,
                self.state.current_page
            );
            self.state.exhaust();
            return Ok(None);
        }

        self.settle_after_click(page_type, target_page).await?;
        self.state.current_page = target_page;

        let records = match browser::snapshot(self.page).await {
            Ok(snap) => self.adapter.extract(&snap),
            Err(e) => {
                ::log::warn!("{}: could not read page {}: {}", page_type, target_page, e);
                self.state.exhaust();
                return Ok(None);
            }
        };

        let mut fresh = 0;
        for record in &records {
            if self.known.insert(&record_key(record)) {
                fresh += 1;
            }
        }
        if fresh == 0 {
            ::log::info!(
                "{}: page {} produced no new exhibitors, stopping",
                page_type,
                target_page
            );
            self.state.exhaust();
            return Ok(None);
        }

        ::log::debug!(
            "{}: page {} yielded {} records ({} new)",
            page_type,
            target_page,
            records.len(),
            fresh
        );
        Ok(Some(records))
    }

    /// Try each target in priority order until one click succeeds
    async fn click_first(&mut self, targets: &[ElementTarget]) -> bool {
        for target in targets {
            match self.page.click(target).await {
                Ok(()) => {
                    ::log::debug!("Clicked pagination control {} #{}", target.css, target.index);
                    return true;
                }
                Err(e) => ::log::debug!("Pagination click failed: {}", e),
            }
        }
        false
    }

    /// Bounded waits after a click. Timeouts are logged and ignored.
    async fn settle_after_click(
        &self,
        page_type: PageType,
        target_page: usize,
    ) -> Result<(), ScrapeError> {
        let wait = self.config.pagination_wait();

        if page_type == PageType::SmallWorldLabs {
            let expected = target_page.to_string();
            let switched = browser::wait_for_condition(self.page, wait, self.cancel, |snap| {
                active_page_is(snap, &expected)
            })
            .await;
            if !switched {
                ::log::warn!("Active page indicator never showed page {}", target_page);
            }

            let reappeared = self
                .page
                .wait_for_element(SMALLWORLDLABS_CONTENT_SELECTOR, wait);
            match browser::or_cancel(self.cancel, reappeared).await? {
                Ok(true) => {}
                Ok(false) => ::log::warn!("Exhibitor table did not reappear in time"),
                Err(e) => ::log::warn!("Waiting for exhibitor table failed: {}", e),
            }
        } else {
            match browser::or_cancel(self.cancel, self.page.wait_until_ready(wait)).await? {
                Ok(true) => {}
                Ok(false) => ::log::warn!("Page did not settle after pagination click"),
                Err(e) => ::log::warn!("Waiting for page to settle failed: {}", e),
            }
        }

        if !sleep_or_cancel(self.config.pagination_settle(), self.cancel).await {
            return Err(ScrapeError::Cancelled);
        }
        Ok(())
    }
}

fn record_key(record: &ExhibitorRecord) -> [&str; 3] {
    [
        record.company_name.as_str(),
        record.booth.as_deref().unwrap_or_default(),
        record.category.as_deref().unwrap_or_default(),
    ]
}

/// Controls that may lead to `target_page`, best first
pub fn next_controls(
    page_type: PageType,
    snap: &PageSnapshot,
    target_page: usize,
) -> Vec<ElementTarget> {
    let doc = snap.document();
    let clickables = select_all(doc.root_element(), CLICKABLE_SELECTOR);

    let find = |predicate: &dyn Fn(ElementRef<'_>) -> bool| {
        clickables
            .iter()
            .position(|el| is_actionable(*el) && predicate(*el))
            .map(|index| ElementTarget::new(CLICKABLE_SELECTOR, index))
    };

    if page_type == PageType::SmallWorldLabs {
        let number = target_page.to_string();
        [
            find(&|el: ElementRef<'_>| in_pager(el) && element_text(el) == number),
            find(&is_next_control),
            find(&is_arrow_control),
        ]
        .into_iter()
        .flatten()
        .fold(Vec::new(), |mut targets, target| {
            if !targets.contains(&target) {
                targets.push(target);
            }
            targets
        })
    } else {
        find(&|el: ElementRef<'_>| is_next_control(el) || is_arrow_control(el))
            .into_iter()
            .collect()
    }
}

/// Whether the pager marks `expected` as the current page
pub fn active_page_is(snap: &PageSnapshot, expected: &str) -> bool {
    let doc = snap.document();
    select_all(doc.root_element(), ACTIVE_PAGE_SELECTOR)
        .into_iter()
        .any(|el| element_text(el) == expected)
}

fn attr_lower(el: ElementRef<'_>, name: &str) -> String {
    el.value().attr(name).unwrap_or_default().to_lowercase()
}

fn class_lower(el: ElementRef<'_>) -> String {
    attr_lower(el, "class")
}

fn is_next_control(el: ElementRef<'_>) -> bool {
    let text = element_text(el).to_lowercase();
    if NEXT_TEXTS.contains(&text.as_str()) || attr_lower(el, "rel") == "next" {
        return true;
    }

    let hints = format!(
        "{} {} {} {}",
        class_lower(el),
        attr_lower(el, "id"),
        attr_lower(el, "aria-label"),
        attr_lower(el, "title")
    );
    hints.contains("next") && !hints.contains("prev")
}

fn is_arrow_control(el: ElementRef<'_>) -> bool {
    if ARROW_TEXTS.contains(&element_text(el).as_str()) {
        return true;
    }
    let own = class_lower(el);
    ARROW_ICON_HINTS.iter().any(|hint| own.contains(hint))
        || select_all(el, "i, span, svg")
            .into_iter()
            .any(|icon| ARROW_ICON_HINTS.iter().any(|hint| class_lower(icon).contains(hint)))
}

/// Inside an element whose class mentions pagination
fn in_pager(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| class_lower(a).contains("pag"))
}

/// Visible and not disabled, judged from markup alone
fn is_actionable(el: ElementRef<'_>) -> bool {
    let value = el.value();
    if value.attr("disabled").is_some() || attr_lower(el, "aria-disabled") == "true" {
        return false;
    }
    if class_lower(el).split_whitespace().any(|c| c == "disabled") {
        return false;
    }

    // A disabled <li> wrapper also disables its link
    if let Some(parent) = el.parent().and_then(ElementRef::wrap) {
        if class_lower(parent).split_whitespace().any(|c| c == "disabled") {
            return false;
        }
    }

    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .all(|node| {
            let style = attr_lower(node, "style").replace(' ', "");
            node.value().attr("hidden").is_none()
                && attr_lower(node, "aria-hidden") != "true"
                && !style.contains("display:none")
                && !style.contains("visibility:hidden")
        })
}
