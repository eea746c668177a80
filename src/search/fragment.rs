//! Text fragments as exposed by a page's text layer.
//!
//! A renderer reports a page's text as an ordered list of items. Most items
//! carry a run of text, but some are structural markers (marked-content
//! begin/end) with no text at all. Fragments keep the index of their item in
//! that full list, so skipping markers never shifts the index a later render
//! callback will use to ask for the same fragment.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One run of text on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Position of the item in the page's full item list
    pub index: usize,
    /// The text exactly as the renderer exposed it
    pub text: String,
}

impl Fragment {
    /// Create a fragment at the given item index.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Build fragments from plain strings, indexed by position.
pub fn fragments_from_strs<S: AsRef<str>>(texts: &[S]) -> Vec<Fragment> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| Fragment::new(index, text.as_ref()))
        .collect()
}

/// Classification of a raw text-layer item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A text run with a string body
    Text,
    /// A structural marker without text
    Marker,
    /// Something that claims to be text but cannot be read as such
    Malformed,
}

/// Classify a raw item.
///
/// Text items are objects with a string `str` field. Objects with a `type`
/// field and no `str` field are markers. Anything else is malformed.
pub fn classify_item(item: &Value) -> ItemKind {
    let Some(object) = item.as_object() else {
        return ItemKind::Malformed;
    };

    match object.get("str") {
        Some(Value::String(_)) => ItemKind::Text,
        Some(_) => ItemKind::Malformed,
        None if object.contains_key("type") => ItemKind::Marker,
        None => ItemKind::Malformed,
    }
}

/// Extract the text fragments from a page's raw item list.
///
/// Markers and malformed items are skipped; the remaining fragments keep
/// their position in `items` as their index.
pub fn fragments_from_items(items: &[Value]) -> Vec<Fragment> {
    let mut fragments = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        match classify_item(item) {
            ItemKind::Text => {
                if let Some(text) = item.get("str").and_then(Value::as_str) {
                    fragments.push(Fragment::new(index, text));
                }
            },
            ItemKind::Marker => {},
            ItemKind::Malformed => {
                log::debug!("Skipping malformed text item at index {}: {}", index, item);
            },
        }
    }

    fragments
}
