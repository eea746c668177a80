//! Seams between the coordinator and the surrounding viewer.
//!
//! The coordinator never talks to a rendering library or a document tree
//! directly. It reports its verdict through a [`ResultSink`] and reaches the
//! painted page through a [`PageLayerLookup`], so any viewer (a browser DOM,
//! a native widget tree, an in-memory test double) can drive it.

use crate::config::ScrollAlign;

/// Receives the one-time found / not-found verdict of a session.
pub trait ResultSink {
    /// Called at most once per session.
    fn on_highlight_result(&mut self, found: bool);
}

impl<F: FnMut(bool)> ResultSink for F {
    fn on_highlight_result(&mut self, found: bool) {
        self(found)
    }
}

/// A sink that keeps every verdict it receives, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedResults {
    results: Vec<bool>,
}

impl RecordedResults {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verdicts received so far.
    pub fn results(&self) -> &[bool] {
        &self.results
    }

    /// The most recent verdict.
    pub fn last(&self) -> Option<bool> {
        self.results.last().copied()
    }
}

impl ResultSink for RecordedResults {
    fn on_highlight_result(&mut self, found: bool) {
        self.results.push(found);
    }
}

/// Access to the painted text layer of each page.
///
/// Implementations look inside what was actually rendered for a page, which
/// is only guaranteed to contain the highlight marker after the renderer has
/// consumed the updated match table.
pub trait PageLayerLookup {
    /// Handle to a rendered element.
    type Element;

    /// Find the first element on `page` carrying `marker_class`.
    fn find_marker(&self, page: u32, marker_class: &str) -> Option<Self::Element>;

    /// Scroll `element` into view.
    fn scroll_into_view(&mut self, element: &Self::Element, align: ScrollAlign);
}
