//! Per-session storage of highlight ranges.

use std::collections::{BTreeMap, HashMap};

use crate::search::{HighlightRange, PageMatch};

/// Highlight ranges keyed by page number, then fragment index.
///
/// A fragment carries at most one range per session, because a page only
/// ever contributes its first match.
#[derive(Debug, Clone, Default)]
pub struct MatchTable {
    pages: HashMap<u32, BTreeMap<usize, HighlightRange>>,
}

impl MatchTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the match for `page`, replacing anything stored before.
    pub fn insert_page(&mut self, page: u32, found: &PageMatch) {
        let ranges = found
            .ranges
            .iter()
            .map(|range| (range.fragment_index, *range))
            .collect();
        self.pages.insert(page, ranges);
    }

    /// Drop the match for `page`. Returns whether one was stored.
    pub fn remove_page(&mut self, page: u32) -> bool {
        self.pages.remove(&page).is_some()
    }

    /// The range for one fragment.
    pub fn range(&self, page: u32, fragment_index: usize) -> Option<&HighlightRange> {
        self.pages.get(&page)?.get(&fragment_index)
    }

    /// All ranges stored for `page`, ordered by fragment index.
    pub fn page_ranges(&self, page: u32) -> Vec<HighlightRange> {
        self.pages
            .get(&page)
            .map(|ranges| ranges.values().copied().collect())
            .unwrap_or_default()
    }

    /// Whether `page` has a match.
    pub fn has_page(&self, page: u32) -> bool {
        self.pages.contains_key(&page)
    }

    /// Pages with a match, ascending.
    pub fn matched_pages(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self.pages.keys().copied().collect();
        pages.sort_unstable();
        pages
    }

    /// Number of pages with a match.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no page has a match.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.pages.clear();
    }
}
