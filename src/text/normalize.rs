//! Offset-preserving text normalization.
//!
//! PDF text layers rarely contain the exact characters a reader types into a
//! search box. Typesetting substitutes curly quotes, long dashes and ligature
//! glyphs, and the renderer splits whitespace unpredictably. This module
//! canonicalizes a string into a comparable form while recording, for every
//! output character, the byte offset of the source character it came from.
//!
//! # Transformations
//!
//! Applied left to right in a single pass:
//! 1. Non-breaking space (U+00A0) becomes a regular space
//! 2. Runs of Unicode whitespace collapse to one ASCII space, mapped to the
//!    first whitespace character of the run
//! 3. Curly quotes become ASCII quotes, en/em dashes become `-`
//! 4. Latin ligatures (U+FB00-U+FB06) expand to their letters, every letter
//!    mapped to the ligature's offset
//!
//! Query normalization additionally trims the leading and trailing space.

use phf::phf_map;

/// Single-character substitutions applied during normalization.
static REPLACEMENTS: phf::Map<char, &'static str> = phf_map! {
    '\u{2018}' => "'",   // LEFT SINGLE QUOTATION MARK
    '\u{2019}' => "'",   // RIGHT SINGLE QUOTATION MARK
    '\u{201C}' => "\"",  // LEFT DOUBLE QUOTATION MARK
    '\u{201D}' => "\"",  // RIGHT DOUBLE QUOTATION MARK
    '\u{2013}' => "-",   // EN DASH
    '\u{2014}' => "-",   // EM DASH
    '\u{FB00}' => "ff",  // LATIN SMALL LIGATURE FF
    '\u{FB01}' => "fi",  // LATIN SMALL LIGATURE FI
    '\u{FB02}' => "fl",  // LATIN SMALL LIGATURE FL
    '\u{FB03}' => "ffi", // LATIN SMALL LIGATURE FFI
    '\u{FB04}' => "ffl", // LATIN SMALL LIGATURE FFL
    '\u{FB05}' => "st",  // LATIN SMALL LIGATURE LONG S T
    '\u{FB06}' => "st",  // LATIN SMALL LIGATURE ST
};

/// Whether the normalized form should be trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Whole query: whitespace collapsed and trimmed at both ends
    Query,
    /// Fragment destined for concatenation: whitespace collapsed, edges kept
    Fragment,
}

/// A normalized string together with its mapping back to the source.
///
/// `positions()[i]` is the byte offset, in the source string, of the
/// character that produced the `i`-th character of `text()`. The mapping is
/// non-decreasing and has exactly one entry per normalized `char`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    positions: Vec<usize>,
}

impl NormalizedText {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, ch: char, source_offset: usize) {
        self.text.push(ch);
        self.positions.push(source_offset);
    }

    fn trim(&mut self) {
        if self.text.ends_with(' ') {
            self.text.pop();
            self.positions.pop();
        }
        if self.text.starts_with(' ') {
            self.text.remove(0);
            self.positions.remove(0);
        }
    }

    /// The normalized string.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source byte offset for each normalized character.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Source byte offset of the `index`-th normalized character.
    pub fn source_offset(&self, index: usize) -> Option<usize> {
        self.positions.get(index).copied()
    }

    /// Number of normalized characters.
    pub fn char_len(&self) -> usize {
        self.positions.len()
    }

    /// Whether normalization produced no characters.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate `(normalized char, source byte offset)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.text.chars().zip(self.positions.iter().copied())
    }

    /// Consume into `(text, positions)`.
    pub fn into_parts(self) -> (String, Vec<usize>) {
        (self.text, self.positions)
    }
}

/// Normalize `source`, keeping a mapping to source byte offsets.
///
/// Never panics; the empty string yields an empty result.
///
/// # Examples
///
/// ```
/// use pdf_quote_locator::text::{normalize, NormalizeMode};
///
/// let normalized = normalize("  \u{FB01}rst\u{00A0}\u{00A0}step ", NormalizeMode::Query);
/// assert_eq!(normalized.text(), "first step");
/// // 'f' and 'i' both come from the ligature at byte 2
/// assert_eq!(&normalized.positions()[..2], &[2, 2]);
/// ```
pub fn normalize(source: &str, mode: NormalizeMode) -> NormalizedText {
    let mut out = NormalizedText::with_capacity(source.len());
    let mut in_whitespace = false;

    for (offset, ch) in source.char_indices() {
        let ch = if ch == '\u{00A0}' { ' ' } else { ch };

        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ', offset);
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;

        match REPLACEMENTS.get(&ch) {
            Some(replacement) => {
                for r in replacement.chars() {
                    out.push(r, offset);
                }
            },
            None => out.push(ch, offset),
        }
    }

    if mode == NormalizeMode::Query {
        out.trim();
    }

    out
}

/// Normalize a query: collapse, substitute and trim.
pub fn normalize_query(query: &str) -> NormalizedText {
    normalize(query, NormalizeMode::Query)
}

/// Normalize a fragment without trimming its edges.
pub fn normalize_fragment(fragment: &str) -> NormalizedText {
    normalize(fragment, NormalizeMode::Fragment)
}
