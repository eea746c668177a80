//! HTML output for highlighted text-layer fragments.
//!
//! A text layer paints each fragment as markup, so every character of
//! document text must be escaped before it reaches the page. The renderer
//! here escapes the text before, inside and after a matched span
//! independently and wraps only the span in a `<mark>` element.

use crate::config::DEFAULT_MARKER_CLASS;
use crate::search::HighlightRange;

/// Escape HTML special characters.
///
/// Replaces &, <, >, ", and ' with their HTML entity equivalents.
///
/// # Arguments
///
/// * `text` - The text to escape
///
/// # Returns
///
/// The escaped text safe for inclusion in HTML.
///
/// # Examples
///
/// ```
/// # use pdf_quote_locator::converters::html::escape_html;
/// let text = "AT&T <Company>";
/// let escaped = escape_html(text);
/// assert_eq!(escaped, "AT&amp;T &lt;Company&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
}

/// Render a fragment with its matched span wrapped in `<mark class="pdf-highlight">`.
///
/// With no ranges the result is exactly `escape_html(original)`. Only the
/// first range is used; a fragment never carries more than one.
///
/// # Examples
///
/// ```
/// # use pdf_quote_locator::converters::html::render_highlighted_text;
/// # use pdf_quote_locator::search::HighlightRange;
/// let html = render_highlighted_text("a <b> c", &[HighlightRange::new(0, 2, 5)]);
/// assert_eq!(html, "a <mark class=\"pdf-highlight\">&lt;b&gt;</mark> c");
/// ```
pub fn render_highlighted_text(original: &str, ranges: &[HighlightRange]) -> String {
    render_highlighted_text_with_class(original, ranges, DEFAULT_MARKER_CLASS)
}

/// Like [`render_highlighted_text`], with a custom marker class.
pub fn render_highlighted_text_with_class(
    original: &str,
    ranges: &[HighlightRange],
    marker_class: &str,
) -> String {
    let Some(range) = ranges.first() else {
        return escape_html(original);
    };

    let (before, marked, after) = match split_at_range(original, range) {
        Some(parts) => parts,
        None => {
            log::debug!(
                "Ignoring highlight {}..{} outside fragment {} ({} bytes)",
                range.start,
                range.end,
                range.fragment_index,
                original.len()
            );
            return escape_html(original);
        },
    };

    let mut out = String::with_capacity(original.len() + marker_class.len() + 32);
    push_escaped(&mut out, before);
    out.push_str("<mark class=\"");
    push_escaped(&mut out, marker_class);
    out.push_str("\">");
    push_escaped(&mut out, marked);
    out.push_str("</mark>");
    push_escaped(&mut out, after);
    out
}

/// Split `text` into the parts before, inside and after `range`.
///
/// Returns `None` for empty, inverted or out-of-bounds ranges and for ranges
/// not on `char` boundaries.
fn split_at_range<'a>(text: &'a str, range: &HighlightRange) -> Option<(&'a str, &'a str, &'a str)> {
    if range.is_empty() || range.end > text.len() {
        return None;
    }
    if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
        return None;
    }
    Some((&text[..range.start], &text[range.start..range.end], &text[range.end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Hello"), "Hello");
        assert_eq!(escape_html("AT&T"), "AT&amp;T");
        assert_eq!(escape_html("<div>"), "&lt;div&gt;");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_html("'apostrophe'"), "&#x27;apostrophe&#x27;");
        assert_eq!(escape_html("<b>&\"'</b>"), "&lt;b&gt;&amp;&quot;&#x27;&lt;/b&gt;");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_no_ranges_is_escape() {
        let text = "x < y && y > z";
        assert_eq!(render_highlighted_text(text, &[]), escape_html(text));
    }

    #[test]
    fn test_middle_span() {
        let html = render_highlighted_text("say hello there", &[HighlightRange::new(0, 4, 9)]);
        assert_eq!(html, "say <mark class=\"pdf-highlight\">hello</mark> there");
    }

    #[test]
    fn test_span_at_start() {
        let html = render_highlighted_text("hello there", &[HighlightRange::new(0, 0, 5)]);
        assert_eq!(html, "<mark class=\"pdf-highlight\">hello</mark> there");
    }

    #[test]
    fn test_span_at_end() {
        let html = render_highlighted_text("say hello", &[HighlightRange::new(0, 4, 9)]);
        assert_eq!(html, "say <mark class=\"pdf-highlight\">hello</mark>");
    }

    #[test]
    fn test_whole_string() {
        let html = render_highlighted_text("hello", &[HighlightRange::new(0, 0, 5)]);
        assert_eq!(html, "<mark class=\"pdf-highlight\">hello</mark>");
    }

    #[test]
    fn test_all_segments_escaped() {
        let html = render_highlighted_text("<a>&\"b'</a>", &[HighlightRange::new(0, 3, 7)]);
        assert_eq!(
            html,
            "&lt;a&gt;<mark class=\"pdf-highlight\">&amp;&quot;b&#x27;</mark>&lt;/a&gt;"
        );
    }

    #[test]
    fn test_invalid_ranges_degrade_to_plain() {
        let text = "caf\u{00E9}";
        let plain = escape_html(text);
        assert_eq!(render_highlighted_text(text, &[HighlightRange::new(0, 2, 1)]), plain);
        assert_eq!(render_highlighted_text(text, &[HighlightRange::new(0, 0, 99)]), plain);
        assert_eq!(render_highlighted_text(text, &[HighlightRange::new(0, 0, 4)]), plain);
        assert_eq!(render_highlighted_text(text, &[HighlightRange::new(0, 3, 3)]), plain);
    }

    #[test]
    fn test_multibyte_span() {
        let html = render_highlighted_text("a caf\u{00E9}!", &[HighlightRange::new(0, 2, 7)]);
        assert_eq!(html, "a <mark class=\"pdf-highlight\">caf\u{00E9}</mark>!");
    }

    #[test]
    fn test_custom_class_is_escaped() {
        let html = render_highlighted_text_with_class(
            "quote",
            &[HighlightRange::new(0, 0, 5)],
            "hit\" onclick=\"x",
        );
        assert_eq!(html, "<mark class=\"hit&quot; onclick=&quot;x\">quote</mark>");
    }
}
