//! In-memory rendered text layer.
//!
//! Holds the HTML painted for every fragment of every page, the way a
//! viewer's text layer would after a render pass, and implements
//! [`PageLayerLookup`] by searching that markup for highlight markers.
//! Used by the replay harness and by viewers that paint outside a DOM.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::ScrollAlign;
use crate::converters::html::escape_html;
use crate::search::Fragment;
use crate::session::{PageLayerLookup, PageScanCoordinator, ResultSink};

lazy_static! {
    /// Regex for the opening tag of a highlight marker
    static ref RE_MARK_OPEN: Regex = Regex::new(r#"<mark class="([^"]*)">"#).unwrap();
}

/// A highlight marker found in a painted page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerElement {
    /// Page holding the marker
    pub page: u32,
    /// Fragment index whose markup holds the marker
    pub fragment_index: usize,
}

/// A scroll performed against the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRecord {
    /// Element scrolled to
    pub element: MarkerElement,
    /// Requested alignment
    pub align: ScrollAlign,
}

/// Painted fragment markup, per page.
#[derive(Debug, Clone, Default)]
pub struct RenderedTextLayer {
    pages: HashMap<u32, Vec<(usize, String)>>,
    scrolls: Vec<ScrollRecord>,
}

impl RenderedTextLayer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the painted markup of `page`.
    pub fn paint(&mut self, page: u32, fragments: Vec<(usize, String)>) {
        self.pages.insert(page, fragments);
    }

    /// Paint `page` by asking the coordinator to render each fragment.
    pub fn paint_from<S: ResultSink>(
        &mut self,
        page: u32,
        fragments: &[Fragment],
        coordinator: &PageScanCoordinator<S>,
    ) {
        let painted = fragments
            .iter()
            .map(|f| (f.index, coordinator.render_fragment(page, f.index, &f.text)))
            .collect();
        self.paint(page, painted);
    }

    /// Painted markup of `page`, in fragment order.
    pub fn page_markup(&self, page: u32) -> Option<&[(usize, String)]> {
        self.pages.get(&page).map(Vec::as_slice)
    }

    /// Markup of `page` joined into one string.
    pub fn page_html(&self, page: u32) -> String {
        self.page_markup(page)
            .map(|fragments| fragments.iter().map(|(_, html)| html.as_str()).collect())
            .unwrap_or_default()
    }

    /// Every scroll performed so far.
    pub fn scrolls(&self) -> &[ScrollRecord] {
        &self.scrolls
    }

    /// Forget all painted pages and scrolls.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.scrolls.clear();
    }
}

impl PageLayerLookup for RenderedTextLayer {
    type Element = MarkerElement;

    fn find_marker(&self, page: u32, marker_class: &str) -> Option<MarkerElement> {
        let wanted = escape_html(marker_class);
        self.pages.get(&page)?.iter().find_map(|(fragment_index, html)| {
            RE_MARK_OPEN
                .captures_iter(html)
                .any(|caps| caps[1].split(' ').any(|class| class == wanted))
                .then_some(MarkerElement {
                    page,
                    fragment_index: *fragment_index,
                })
        })
    }

    fn scroll_into_view(&mut self, element: &MarkerElement, align: ScrollAlign) {
        log::debug!(
            "Scrolling page {} fragment {} into view ({:?})",
            element.page,
            element.fragment_index,
            align
        );
        self.scrolls.push(ScrollRecord {
            element: *element,
            align,
        });
    }
}
