//! Output converters.
//!
//! Currently a single converter: HTML for text-layer fragments, with the
//! matched span of a quote wrapped in a highlight marker.

pub mod html;

pub use html::{escape_html, render_highlighted_text, render_highlighted_text_with_class};
