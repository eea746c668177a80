//! The page-scan coordinator.
//!
//! Pages of a document resolve their text independently and in no particular
//! order. The coordinator is fed one event per page as text becomes
//! available and one as the page's text layer finishes painting. It keeps
//! the match table that fragment rendering reads from, reports exactly once
//! whether the quote was found anywhere, and scrolls to the first match at
//! most once.
//!
//! # States
//!
//! - `Idle`: no query, every event is a no-op
//! - `Scanning`: query set, no verdict yet
//! - `Reported`: verdict issued; later pages still update the match table but
//!   never produce a second verdict or a second scroll
//!
//! A found verdict needs one matching page. A not-found verdict needs every
//! page of the document to have reported its text, so a page that never
//! renders withholds it indefinitely.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::config::HighlightConfig;
use crate::converters::html::render_highlighted_text_with_class;
use crate::search::{fragments_from_items, Fragment, HighlightRange, QueryMatcher};
use crate::session::collaborators::{PageLayerLookup, ResultSink};
use crate::session::match_table::MatchTable;
use crate::text::NormalizeMode;

/// Observable phase of a search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No query is active
    Idle,
    /// Query active, verdict not issued yet
    Scanning,
    /// Found / not-found verdict issued
    Reported,
}

/// Mutable state of one session. Reset as a whole on query change.
#[derive(Debug, Default)]
struct SessionState {
    matches: MatchTable,
    first_match_page: Option<u32>,
    has_scrolled: bool,
    has_reported: bool,
    scanned_pages: HashSet<u32>,
    // scanned pages inside `1..=page_count`
    pages_in_range: u32,
}

/// Coordinates quote matching across asynchronously rendered pages.
///
/// # Examples
///
/// ```
/// use pdf_quote_locator::search::fragments_from_strs;
/// use pdf_quote_locator::session::{PageScanCoordinator, RecordedResults};
///
/// let mut coordinator = PageScanCoordinator::new(RecordedResults::new());
/// coordinator.set_page_count(2);
/// coordinator.set_query("hello");
///
/// coordinator.on_text_available(2, &fragments_from_strs(&["hello again"]));
/// coordinator.on_text_available(1, &fragments_from_strs(&["hello"]));
///
/// assert_eq!(coordinator.sink().results(), &[true]);
/// assert_eq!(coordinator.first_match_page(), Some(2));
/// assert_eq!(
///     coordinator.render_fragment(2, 0, "hello again"),
///     "<mark class=\"pdf-highlight\">hello</mark> again"
/// );
/// ```
#[derive(Debug)]
pub struct PageScanCoordinator<S: ResultSink> {
    config: HighlightConfig,
    sink: S,
    page_count: Option<u32>,
    query: String,
    matcher: Option<QueryMatcher>,
    state: SessionState,
    render_token: u64,
}

impl<S: ResultSink> PageScanCoordinator<S> {
    /// Create an idle coordinator with default configuration.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, HighlightConfig::default())
    }

    /// Create an idle coordinator with the given configuration.
    pub fn with_config(sink: S, config: HighlightConfig) -> Self {
        Self {
            config,
            sink,
            page_count: None,
            query: String::new(),
            matcher: None,
            state: SessionState::default(),
            render_token: 0,
        }
    }

    /// Record the number of pages in the document.
    ///
    /// Loading a document with a different page count starts a fresh
    /// session for the current query.
    pub fn set_page_count(&mut self, page_count: u32) {
        match self.page_count {
            Some(previous) if previous == page_count => return,
            Some(previous) => {
                log::info!(
                    "Document changed from {} to {} pages, restarting session",
                    previous,
                    page_count
                );
                self.reset_state();
            },
            None => {
                self.state.pages_in_range = self
                    .state
                    .scanned_pages
                    .iter()
                    .filter(|&&page| page >= 1 && page <= page_count)
                    .count() as u32;
            },
        }
        self.page_count = Some(page_count);

        if self.matcher.is_some() && !self.state.has_reported && self.all_pages_scanned() {
            self.report(false);
        }
    }

    /// Start a new session for `query`.
    ///
    /// Setting the query currently in effect is a no-op. An empty or
    /// whitespace-only query ends the session without a verdict.
    pub fn set_query(&mut self, query: &str) {
        if query == self.query {
            return;
        }

        self.query = query.to_string();
        self.reset_state();

        self.matcher = if query.trim().is_empty() {
            None
        } else {
            let mode = if self.config.trim_query {
                NormalizeMode::Query
            } else {
                NormalizeMode::Fragment
            };
            QueryMatcher::with_mode(query, mode)
        };

        match &self.matcher {
            Some(matcher) => log::debug!("Search session started for '{}'", matcher.query()),
            None => log::debug!("Search session idle"),
        }
    }

    /// End the current session, as if the query had been cleared.
    pub fn clear_query(&mut self) {
        self.set_query("");
    }

    fn reset_state(&mut self) {
        self.state = SessionState::default();
        self.bump_render_token();
    }

    fn bump_render_token(&mut self) {
        self.render_token = self.render_token.wrapping_add(1);
    }

    /// Handle the text of `page` becoming available.
    pub fn on_text_available(&mut self, page: u32, fragments: &[Fragment]) {
        let Some(matcher) = &self.matcher else {
            return;
        };

        let in_range = self.is_in_range(page);
        if !in_range {
            log::warn!(
                "Text for page {} outside document of {} pages",
                page,
                self.page_count.unwrap_or_default()
            );
        }

        let found = matcher.find_in_page(fragments);
        if self.state.scanned_pages.insert(page) && in_range && self.page_count.is_some() {
            self.state.pages_in_range += 1;
        }

        match &found {
            Some(page_match) => {
                log::debug!(
                    "Page {}: matched '{}' across {} fragment(s)",
                    page,
                    page_match.matched_text,
                    page_match.ranges.len()
                );
                self.state.matches.insert_page(page, page_match);
                if in_range && self.state.first_match_page.is_none() {
                    self.state.first_match_page = Some(page);
                }
                self.bump_render_token();
            },
            None => {
                if self.state.matches.remove_page(page) {
                    if self.state.first_match_page == Some(page) && !self.state.has_scrolled {
                        self.state.first_match_page = self.promoted_match_page();
                    }
                    self.bump_render_token();
                }
            },
        }

        if self.state.has_reported {
            return;
        }
        if found.is_some() && in_range {
            self.report(true);
        } else if self.all_pages_scanned() {
            self.report(false);
        }
    }

    /// Handle the text of `page` as raw renderer items.
    pub fn on_text_items(&mut self, page: u32, items: &[Value]) {
        if self.matcher.is_none() {
            return;
        }
        let fragments = fragments_from_items(items);
        self.on_text_available(page, &fragments);
    }

    /// Handle the text layer of `page` finishing its paint.
    ///
    /// Scrolls to the highlight marker when `page` holds the first match and
    /// no scroll has happened yet. Returns whether a scroll was issued.
    pub fn on_layer_rendered<L: PageLayerLookup>(&mut self, page: u32, layer: &mut L) -> bool {
        if self.matcher.is_none()
            || self.state.has_scrolled
            || self.state.first_match_page != Some(page)
        {
            return false;
        }

        match layer.find_marker(page, &self.config.marker_class) {
            Some(element) => {
                layer.scroll_into_view(&element, self.config.scroll_align);
                self.state.has_scrolled = true;
                log::debug!("Scrolled to first match on page {}", page);
                true
            },
            None => {
                log::debug!("Page {} rendered without a highlight marker yet", page);
                false
            },
        }
    }

    /// Render one fragment as HTML, highlighted when it holds the match.
    ///
    /// Pure read of the match table; safe to call for pages not yet scanned.
    pub fn render_fragment(&self, page: u32, fragment_index: usize, text: &str) -> String {
        let ranges = self
            .state
            .matches
            .range(page, fragment_index)
            .map(std::slice::from_ref)
            .unwrap_or_default();
        render_highlighted_text_with_class(text, ranges, &self.config.marker_class)
    }

    fn report(&mut self, found: bool) {
        self.state.has_reported = true;
        log::info!(
            "Quote {} after scanning {} page(s)",
            if found { "found" } else { "not found" },
            self.state.scanned_pages.len()
        );
        self.sink.on_highlight_result(found);
    }

    fn all_pages_scanned(&self) -> bool {
        match self.page_count {
            Some(count) if count > 0 => self.state.pages_in_range == count,
            _ => false,
        }
    }

    /// Whether `page` belongs to the document. Any page does while the page
    /// count is unknown.
    fn is_in_range(&self, page: u32) -> bool {
        self.page_count.map_or(true, |count| page >= 1 && page <= count)
    }

    /// Lowest in-range page still holding a match.
    fn promoted_match_page(&self) -> Option<u32> {
        self.state
            .matches
            .matched_pages()
            .into_iter()
            .find(|&page| self.is_in_range(page))
    }

    /// Current session phase.
    pub fn phase(&self) -> SessionPhase {
        if self.matcher.is_none() {
            SessionPhase::Idle
        } else if self.state.has_reported {
            SessionPhase::Reported
        } else {
            SessionPhase::Scanning
        }
    }

    /// Whether a query is active.
    pub fn is_active(&self) -> bool {
        self.matcher.is_some()
    }

    /// The query as last set, before normalization.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The session configuration.
    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Document page count, once known.
    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    /// Monotonic counter bumped whenever rendered output may have changed.
    ///
    /// Viewers memoizing fragment rendering key their cache on this value.
    pub fn render_token(&self) -> u64 {
        self.render_token
    }

    /// Page whose text-available event first produced a match.
    pub fn first_match_page(&self) -> Option<u32> {
        self.state.first_match_page
    }

    /// Whether the first match has been scrolled into view.
    pub fn has_scrolled(&self) -> bool {
        self.state.has_scrolled
    }

    /// Whether the verdict has been issued.
    pub fn has_reported(&self) -> bool {
        self.state.has_reported
    }

    /// Number of distinct pages whose text has been scanned.
    pub fn scanned_page_count(&self) -> usize {
        self.state.scanned_pages.len()
    }

    /// Whether `page` has been scanned in this session.
    pub fn is_page_scanned(&self, page: u32) -> bool {
        self.state.scanned_pages.contains(&page)
    }

    /// Highlight ranges stored for `page`.
    pub fn matches_for_page(&self, page: u32) -> Vec<HighlightRange> {
        self.state.matches.page_ranges(page)
    }

    /// The session's match table.
    pub fn match_table(&self) -> &MatchTable {
        &self.state.matches
    }

    /// The result sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the result sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the coordinator, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
