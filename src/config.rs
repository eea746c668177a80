//! Configuration for quote highlighting sessions.

use serde::{Deserialize, Serialize};

/// CSS class carried by the `<mark>` element wrapping a matched span.
pub const DEFAULT_MARKER_CLASS: &str = "pdf-highlight";

/// Where a scrolled-to element ends up inside its scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollAlign {
    /// Align the element with the top of the viewport
    Start,
    /// Center the element in the viewport
    #[default]
    Center,
    /// Align the element with the bottom of the viewport
    End,
    /// Scroll as little as possible to make the element visible
    Nearest,
}

/// Highlight session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Class name written on the highlight `<mark>` element and looked up
    /// when scrolling to the first match.
    pub marker_class: String,

    /// Alignment requested when scrolling the first match into view.
    pub scroll_align: ScrollAlign,

    /// Trim leading and trailing whitespace from the query before matching.
    pub trim_query: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
            scroll_align: ScrollAlign::Center,
            trim_query: true,
        }
    }

    /// Set the highlight marker class.
    pub fn with_marker_class(mut self, class: impl Into<String>) -> Self {
        self.marker_class = class.into();
        self
    }

    /// Set the scroll alignment.
    pub fn with_scroll_align(mut self, align: ScrollAlign) -> Self {
        self.scroll_align = align;
        self
    }

    /// Set whether the query is trimmed before matching.
    pub fn with_trim_query(mut self, trim: bool) -> Self {
        self.trim_query = trim;
        self
    }
}
