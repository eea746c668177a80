//! Quote search over a page's text fragments.
//!
//! This module locates the first occurrence of a quote on a page whose text
//! is split into independently produced fragments, and reports the match as
//! byte ranges inside the original fragment strings. Supports:
//! - Matches spanning any number of fragments
//! - Case-insensitive comparison after typographic normalization
//! - Renderer item lists containing markers and malformed entries
//!
//! ## Example
//!
//! ```
//! use pdf_quote_locator::search::{fragments_from_strs, QueryMatcher};
//!
//! let matcher = QueryMatcher::new("Hello World").unwrap();
//! let page = fragments_from_strs(&["say hel", "lo\u{00A0}world!"]);
//!
//! let found = matcher.find_in_page(&page).unwrap();
//! assert_eq!(found.ranges.len(), 2);
//! assert_eq!(&page[1].text[..found.ranges[1].end], "lo\u{00A0}world");
//! ```

mod fragment;
mod matcher;

pub use fragment::{classify_item, fragments_from_items, fragments_from_strs, Fragment, ItemKind};
pub use matcher::{find_match_in_page, HighlightRange, PageBuffer, PageMatch, QueryMatcher};

/// Find the first occurrence of `query` in a page's raw renderer items.
///
/// Markers and malformed items are skipped without shifting fragment indices.
pub fn find_match_in_items(items: &[serde_json::Value], query: &str) -> Option<PageMatch> {
    find_match_in_page(&fragments_from_items(items), query)
}
