//! Cross-fragment quote matching.
//!
//! A renderer segments a page's text by font run and position, not by word,
//! so a quote can start in one fragment and end several fragments later. The
//! matcher normalizes every fragment, concatenates them into a single page
//! buffer, and records for every buffer byte which fragment and which source
//! character produced it. A case-insensitive literal search over the buffer
//! then maps straight back to per-fragment offsets in the original strings.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::search::fragment::Fragment;
use crate::text::{normalize, normalize_fragment, NormalizeMode};

/// A matched span inside one fragment, in original byte offsets.
///
/// `start..end` is half-open and always lies on `char` boundaries of the
/// fragment text, so `&fragment.text[range.start..range.end]` is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
    /// Index of the fragment in the page's full item list
    pub fragment_index: usize,
    /// First matched byte
    pub start: usize,
    /// One past the last matched byte
    pub end: usize,
}

impl HighlightRange {
    /// Create a new range.
    pub fn new(fragment_index: usize, start: usize, end: usize) -> Self {
        Self {
            fragment_index,
            start,
            end,
        }
    }

    /// Length of the range in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers nothing.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// The first occurrence of a query on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMatch {
    /// The matched normalized text, as found in the page buffer
    pub matched_text: String,
    /// One range per touched fragment, ordered by fragment index
    pub ranges: Vec<HighlightRange>,
}

impl PageMatch {
    /// The range touching the given fragment, if any.
    pub fn range_for(&self, fragment_index: usize) -> Option<&HighlightRange> {
        self.ranges.iter().find(|r| r.fragment_index == fragment_index)
    }
}

/// Where a byte of the page buffer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourcePos {
    fragment_index: usize,
    offset: usize,
    char_len: usize,
}

/// The normalized text of a whole page with a byte-level source mapping.
#[derive(Debug, Clone, Default)]
pub struct PageBuffer {
    text: String,
    // one entry per byte of `text`
    sources: Vec<SourcePos>,
}

impl PageBuffer {
    /// Normalize and concatenate the fragments of one page.
    ///
    /// Whitespace collapsing carries across fragment boundaries: a space is
    /// dropped when the buffer already ends with one.
    pub fn build(fragments: &[Fragment]) -> Self {
        let capacity = fragments.iter().map(|f| f.text.len()).sum();
        let mut buffer = Self {
            text: String::with_capacity(capacity),
            sources: Vec::with_capacity(capacity),
        };

        for fragment in fragments {
            let normalized = normalize_fragment(&fragment.text);
            for (ch, offset) in normalized.iter() {
                if ch == ' ' && buffer.text.ends_with(' ') {
                    continue;
                }
                let char_len = fragment.text[offset..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
                let pos = SourcePos {
                    fragment_index: fragment.index,
                    offset,
                    char_len,
                };
                buffer.text.push(ch);
                for _ in 0..ch.len_utf8() {
                    buffer.sources.push(pos);
                }
            }
        }

        buffer
    }

    /// The concatenated normalized page text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Group the buffer bytes `start..end` into per-fragment ranges.
    fn ranges_for(&self, start: usize, end: usize) -> Vec<HighlightRange> {
        let mut spans: BTreeMap<usize, (usize, usize)> = BTreeMap::new();

        for pos in self.sources.get(start..end).unwrap_or_default() {
            let span_end = pos.offset + pos.char_len;
            spans
                .entry(pos.fragment_index)
                .and_modify(|(lo, hi)| {
                    *lo = (*lo).min(pos.offset);
                    *hi = (*hi).max(span_end);
                })
                .or_insert((pos.offset, span_end));
        }

        spans
            .into_iter()
            .map(|(fragment_index, (start, end))| HighlightRange::new(fragment_index, start, end))
            .collect()
    }
}

/// A compiled query, reusable across every page of a document.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    query: String,
    regex: Regex,
}

impl QueryMatcher {
    /// Compile a trimmed query. Returns `None` if it normalizes to nothing.
    pub fn new(query: &str) -> Option<Self> {
        Self::with_mode(query, NormalizeMode::Query)
    }

    /// Compile a query normalized with the given mode.
    pub fn with_mode(query: &str, mode: NormalizeMode) -> Option<Self> {
        let normalized = normalize(query, mode);
        if normalized.is_empty() {
            return None;
        }

        let (query, _) = normalized.into_parts();
        match RegexBuilder::new(&regex::escape(&query))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self { query, regex }),
            Err(e) => {
                log::warn!("Cannot compile query of {} bytes: {}", query.len(), e);
                None
            },
        }
    }

    /// The normalized query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Find the first occurrence of the query across a page's fragments.
    pub fn find_in_page(&self, fragments: &[Fragment]) -> Option<PageMatch> {
        if fragments.is_empty() {
            return None;
        }

        let buffer = PageBuffer::build(fragments);
        let found = self.regex.find(buffer.text())?;

        let ranges = buffer.ranges_for(found.start(), found.end());
        if ranges.is_empty() {
            return None;
        }

        Some(PageMatch {
            matched_text: found.as_str().to_string(),
            ranges,
        })
    }
}

/// Find the first case-insensitive occurrence of `query` on one page.
///
/// Returns `None` when the query is empty after normalization, the page has
/// no fragments, or the query does not occur.
///
/// # Examples
///
/// ```
/// use pdf_quote_locator::search::{find_match_in_page, fragments_from_strs, HighlightRange};
///
/// let fragments = fragments_from_strs(&["hel", "lo wor", "ld"]);
/// let found = find_match_in_page(&fragments, "hello world").unwrap();
/// assert_eq!(
///     found.ranges,
///     vec![
///         HighlightRange::new(0, 0, 3),
///         HighlightRange::new(1, 0, 6),
///         HighlightRange::new(2, 0, 2),
///     ]
/// );
/// ```
pub fn find_match_in_page(fragments: &[Fragment], query: &str) -> Option<PageMatch> {
    QueryMatcher::new(query)?.find_in_page(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fragment::fragments_from_strs;

    #[test]
    fn test_split_across_three_fragments() {
        let fragments = fragments_from_strs(&["hel", "lo wor", "ld"]);
        let found = find_match_in_page(&fragments, "hello world").unwrap();
        assert_eq!(found.matched_text, "hello world");
        assert_eq!(
            found.ranges,
            vec![
                HighlightRange::new(0, 0, 3),
                HighlightRange::new(1, 0, 6),
                HighlightRange::new(2, 0, 2),
            ]
        );
    }

    #[test]
    fn test_case_insensitive() {
        let fragments = fragments_from_strs(&["Hello World"]);
        let found = find_match_in_page(&fragments, "hello").unwrap();
        assert_eq!(found.ranges, vec![HighlightRange::new(0, 0, 5)]);
        assert_eq!(found.matched_text, "Hello");
    }

    #[test]
    fn test_no_match() {
        let fragments = fragments_from_strs(&["Hello World"]);
        assert!(find_match_in_page(&fragments, "goodbye").is_none());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(find_match_in_page(&[], "hello").is_none());
        let fragments = fragments_from_strs(&["hello"]);
        assert!(find_match_in_page(&fragments, "").is_none());
        assert!(find_match_in_page(&fragments, "  \t ").is_none());
        assert!(QueryMatcher::new("\u{00A0}").is_none());
    }

    #[test]
    fn test_first_occurrence_only() {
        let fragments = fragments_from_strs(&["one cat", " two cat", " three cat"]);
        let found = find_match_in_page(&fragments, "cat").unwrap();
        assert_eq!(found.ranges, vec![HighlightRange::new(0, 4, 7)]);
    }

    #[test]
    fn test_ligature_in_source() {
        let fragments = fragments_from_strs(&["the \u{FB01}rst step"]);
        let found = find_match_in_page(&fragments, "first").unwrap();
        // the ligature is three bytes, "rst" follows
        assert_eq!(found.ranges, vec![HighlightRange::new(0, 4, 10)]);
        assert_eq!(&fragments[0].text[4..10], "\u{FB01}rst");
    }

    #[test]
    fn test_match_inside_ligature_covers_whole_glyph() {
        let fragments = fragments_from_strs(&["o\u{FB03}ce"]);
        let found = find_match_in_page(&fragments, "ic").unwrap();
        assert_eq!(found.ranges, vec![HighlightRange::new(0, 1, 5)]);
    }

    #[test]
    fn test_curly_quotes_in_source() {
        let fragments = fragments_from_strs(&["He said \u{201C}don\u{2019}t\u{201D}."]);
        let found = find_match_in_page(&fragments, "\"don't\"").unwrap();
        let range = found.ranges[0];
        assert_eq!(&fragments[0].text[range.start..range.end], "\u{201C}don\u{2019}t\u{201D}");
    }

    #[test]
    fn test_query_with_typographic_characters() {
        let fragments = fragments_from_strs(&["pages 10-12"]);
        let found = find_match_in_page(&fragments, "10\u{2013}12").unwrap();
        assert_eq!(found.ranges, vec![HighlightRange::new(0, 6, 11)]);
    }

    #[test]
    fn test_whitespace_collapses_across_fragments() {
        let fragments = fragments_from_strs(&["hello ", " ", "  world"]);
        let buffer = PageBuffer::build(&fragments);
        assert_eq!(buffer.text(), "hello world");

        let found = find_match_in_page(&fragments, "hello world").unwrap();
        assert_eq!(
            found.ranges,
            vec![HighlightRange::new(0, 0, 6), HighlightRange::new(2, 2, 7)]
        );
    }

    #[test]
    fn test_whitespace_only_fragment_as_gap() {
        let fragments = fragments_from_strs(&["hello", " ", "world"]);
        let found = find_match_in_page(&fragments, "hello world").unwrap();
        assert_eq!(
            found.ranges,
            vec![
                HighlightRange::new(0, 0, 5),
                HighlightRange::new(1, 0, 1),
                HighlightRange::new(2, 0, 5),
            ]
        );
    }

    #[test]
    fn test_gapped_indices_preserved() {
        let fragments = vec![Fragment::new(2, "quick "), Fragment::new(5, "brown fox")];
        let found = find_match_in_page(&fragments, "quick brown").unwrap();
        assert_eq!(
            found.ranges,
            vec![HighlightRange::new(2, 0, 6), HighlightRange::new(5, 0, 5)]
        );
        assert!(found.range_for(5).is_some());
        assert!(found.range_for(3).is_none());
    }

    #[test]
    fn test_multibyte_offsets_on_char_boundaries() {
        let fragments = fragments_from_strs(&["caf\u{00E9} ", "cr\u{00E8}me"]);
        let found = find_match_in_page(&fragments, "CAF\u{00C9} CR\u{00C8}ME").unwrap();
        for range in &found.ranges {
            let text = &fragments.iter().find(|f| f.index == range.fragment_index).unwrap().text;
            assert!(text.is_char_boundary(range.start));
            assert!(text.is_char_boundary(range.end));
        }
        assert_eq!(
            found.ranges,
            vec![HighlightRange::new(0, 0, 6), HighlightRange::new(1, 0, 6)]
        );
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let fragments = fragments_from_strs(&["cost: $5.00 (approx)"]);
        assert!(find_match_in_page(&fragments, "$5.00 (approx)").is_some());
        assert!(find_match_in_page(&fragments, "$5x00").is_none());
    }

    #[test]
    fn test_query_matcher_reusable() {
        let matcher = QueryMatcher::new("  Needle ").unwrap();
        assert_eq!(matcher.query(), "Needle");
        assert!(matcher.find_in_page(&fragments_from_strs(&["a needle"])).is_some());
        assert!(matcher.find_in_page(&fragments_from_strs(&["haystack"])).is_none());
    }

    #[test]
    fn test_untrimmed_mode_keeps_edge_space() {
        let matcher = QueryMatcher::with_mode(" end", NormalizeMode::Fragment).unwrap();
        assert_eq!(matcher.query(), " end");
        assert!(matcher.find_in_page(&fragments_from_strs(&["endless"])).is_none());
        assert!(matcher.find_in_page(&fragments_from_strs(&["the end"])).is_some());
    }

    #[test]
    fn test_highlight_range_len() {
        let range = HighlightRange::new(0, 3, 7);
        assert_eq!(range.len(), 4);
        assert!(!range.is_empty());
        assert!(HighlightRange::new(0, 5, 5).is_empty());
    }
}
