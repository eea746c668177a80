//! Scripted replay of a search session.
//!
//! A replay script describes a document as the raw text-layer items of each
//! page, a query, and the order in which the renderer fires its per-page
//! events. Running the script drives a [`PageScanCoordinator`] against an
//! in-memory [`RenderedTextLayer`] and reports what a viewer would observe:
//! the verdicts, the scroll, and the final markup of every fragment.
//!
//! ## Script format
//!
//! ```json
//! {
//!   "query": "hello world",
//!   "config": { "marker_class": "pdf-highlight" },
//!   "pages": {
//!     "1": [ {"str": "hel"}, {"type": "beginMarkedContent"}, {"str": "lo world"} ],
//!     "2": [ {"str": "nothing here"} ]
//!   },
//!   "events": [
//!     {"kind": "text_available", "page": 2},
//!     {"kind": "text_available", "page": 1},
//!     {"kind": "layer_rendered", "page": 1},
//!     {"kind": "set_query", "query": "nothing"}
//!   ]
//! }
//! ```
//!
//! Pages must be numbered `1..=N` without gaps. When `events` is omitted,
//! every page fires text-available in page order, then every page fires
//! layer-rendered.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::HighlightConfig;
use crate::error::{Error, Result};
use crate::layer::RenderedTextLayer;
use crate::search::{fragments_from_items, Fragment};
use crate::session::{PageScanCoordinator, RecordedResults, SessionPhase};

/// One renderer event in a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// Text extraction finished for a page
    TextAvailable {
        /// Page number
        page: u32,
    },
    /// A page's text layer finished painting
    LayerRendered {
        /// Page number
        page: u32,
    },
    /// The user changed the query
    SetQuery {
        /// New query
        query: String,
    },
}

/// A replayable session description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Initial query
    #[serde(default)]
    pub query: String,
    /// Session configuration
    #[serde(default)]
    pub config: HighlightConfig,
    /// Raw text-layer items per page, keyed by page number
    pub pages: BTreeMap<String, Vec<Value>>,
    /// Event order; `None` means text for every page, then layers
    #[serde(default)]
    pub events: Option<Vec<ReplayEvent>>,
}

/// Markup painted for one fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFragment {
    /// Fragment index in the page's item list
    pub index: usize,
    /// Painted HTML
    pub html: String,
}

/// Location of the scroll issued during a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollTarget {
    /// Page scrolled to
    pub page: u32,
    /// Fragment holding the marker
    pub fragment_index: usize,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Query in effect at the end
    pub query: String,
    /// Every verdict issued, across all sessions, in order
    pub results: Vec<bool>,
    /// Every scroll issued, across all sessions, in order
    pub scrolls: Vec<ScrollTarget>,
    /// First matching page of the final session
    pub first_match_page: Option<u32>,
    /// Phase of the final session
    pub phase: SessionPhase,
    /// Final render token
    pub render_token: u64,
    /// Final markup of every fragment, by page
    pub pages: BTreeMap<u32, Vec<RenderedFragment>>,
}

impl ReplayScript {
    /// Parse a script from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a script file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Convert the page table into fragments, checking page numbering.
    pub fn page_fragments(&self) -> Result<BTreeMap<u32, Vec<Fragment>>> {
        let mut pages = BTreeMap::new();
        for (key, items) in &self.pages {
            let page: u32 = key
                .trim()
                .parse()
                .ok()
                .filter(|&p| p > 0)
                .ok_or_else(|| Error::InvalidPageKey(key.clone()))?;
            if pages.insert(page, fragments_from_items(items)).is_some() {
                return Err(Error::InvalidScript(format!("page {} listed twice", page)));
            }
        }

        let page_count = pages.len() as u32;
        if let Some((&last, _)) = pages.last_key_value() {
            if last != page_count {
                return Err(Error::InvalidScript(format!(
                    "pages must be numbered 1..={} without gaps, found page {}",
                    page_count, last
                )));
            }
        }

        Ok(pages)
    }

    /// The events to replay, filling in the default order when omitted.
    pub fn resolved_events(&self, page_count: u32) -> Vec<ReplayEvent> {
        match &self.events {
            Some(events) => events.clone(),
            None => (1..=page_count)
                .map(|page| ReplayEvent::TextAvailable { page })
                .chain((1..=page_count).map(|page| ReplayEvent::LayerRendered { page }))
                .collect(),
        }
    }

    /// Run the script.
    pub fn run(&self) -> Result<ReplayReport> {
        let pages = self.page_fragments()?;
        let page_count = pages.len() as u32;
        let events = self.resolved_events(page_count);

        for event in &events {
            if let ReplayEvent::TextAvailable { page } | ReplayEvent::LayerRendered { page } = event {
                if !pages.contains_key(page) {
                    return Err(Error::UnknownPage {
                        page: *page,
                        page_count,
                    });
                }
            }
        }

        let mut coordinator =
            PageScanCoordinator::with_config(RecordedResults::new(), self.config.clone());
        coordinator.set_page_count(page_count);
        coordinator.set_query(&self.query);

        let mut layer = RenderedTextLayer::new();
        let no_fragments: Vec<Fragment> = Vec::new();

        for event in events {
            log::debug!("Replaying {:?}", event);
            match event {
                ReplayEvent::TextAvailable { page } => {
                    let fragments = pages.get(&page).unwrap_or(&no_fragments);
                    coordinator.on_text_available(page, fragments);
                },
                ReplayEvent::LayerRendered { page } => {
                    let fragments = pages.get(&page).unwrap_or(&no_fragments);
                    layer.paint_from(page, fragments, &coordinator);
                    coordinator.on_layer_rendered(page, &mut layer);
                },
                ReplayEvent::SetQuery { query } => coordinator.set_query(&query),
            }
        }

        let rendered = pages
            .iter()
            .map(|(&page, fragments)| {
                let painted = fragments
                    .iter()
                    .map(|f| RenderedFragment {
                        index: f.index,
                        html: coordinator.render_fragment(page, f.index, &f.text),
                    })
                    .collect();
                (page, painted)
            })
            .collect();

        let scrolls = layer
            .scrolls()
            .iter()
            .map(|record| ScrollTarget {
                page: record.element.page,
                fragment_index: record.element.fragment_index,
            })
            .collect();

        Ok(ReplayReport {
            query: coordinator.query().to_string(),
            results: coordinator.sink().results().to_vec(),
            scrolls,
            first_match_page: coordinator.first_match_page(),
            phase: coordinator.phase(),
            render_token: coordinator.render_token(),
            pages: rendered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "query": "hello world",
        "pages": {
            "1": [ {"str": "nothing here"} ],
            "2": [ {"str": "hel"}, {"type": "beginMarkedContent"}, {"str": "lo world"} ]
        }
    }"#;

    #[test]
    fn test_default_event_order() {
        let report = ReplayScript::from_json(SCRIPT).unwrap().run().unwrap();

        assert_eq!(report.results, vec![true]);
        assert_eq!(report.first_match_page, Some(2));
        assert_eq!(report.phase, SessionPhase::Reported);
        assert_eq!(
            report.scrolls,
            vec![ScrollTarget {
                page: 2,
                fragment_index: 0
            }]
        );
        assert_eq!(report.pages[&1][0].html, "nothing here");
        assert_eq!(report.pages[&2][1].index, 2);
        assert_eq!(
            report.pages[&2][1].html,
            "<mark class=\"pdf-highlight\">lo world</mark>"
        );
    }

    #[test]
    fn test_explicit_events_and_query_change() {
        let mut script = ReplayScript::from_json(SCRIPT).unwrap();
        script.events = Some(vec![
            ReplayEvent::TextAvailable { page: 2 },
            ReplayEvent::SetQuery {
                query: "xyz".to_string(),
            },
            ReplayEvent::TextAvailable { page: 1 },
            ReplayEvent::TextAvailable { page: 2 },
            ReplayEvent::LayerRendered { page: 2 },
        ]);

        let report = script.run().unwrap();
        assert_eq!(report.results, vec![true, false]);
        assert!(report.scrolls.is_empty());
        assert_eq!(report.query, "xyz");
        assert_eq!(report.pages[&2][0].html, "hel");
    }

    #[test]
    fn test_unknown_page_event() {
        let mut script = ReplayScript::from_json(SCRIPT).unwrap();
        script.events = Some(vec![ReplayEvent::LayerRendered { page: 9 }]);
        assert!(matches!(
            script.run(),
            Err(Error::UnknownPage {
                page: 9,
                page_count: 2
            })
        ));
    }

    #[test]
    fn test_page_gap_rejected() {
        let script = ReplayScript::from_json(r#"{"pages": {"1": [], "3": []}}"#).unwrap();
        assert!(matches!(script.run(), Err(Error::InvalidScript(_))));
    }

    #[test]
    fn test_bad_page_key_rejected() {
        let script = ReplayScript::from_json(r#"{"pages": {"0": []}}"#).unwrap();
        assert!(matches!(script.run(), Err(Error::InvalidPageKey(_))));
        let script = ReplayScript::from_json(r#"{"pages": {"one": []}}"#).unwrap();
        assert!(matches!(script.run(), Err(Error::InvalidPageKey(_))));
    }

    #[test]
    fn test_events_json_shape() {
        let event: ReplayEvent =
            serde_json::from_str(r#"{"kind": "set_query", "query": "abc"}"#).unwrap();
        assert_eq!(
            event,
            ReplayEvent::SetQuery {
                query: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_empty_query_never_reports() {
        let script = ReplayScript::from_json(r#"{"pages": {"1": [{"str": "a"}]}}"#).unwrap();
        let report = script.run().unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.phase, SessionPhase::Idle);
    }
}
