// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::module_name_repetitions)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Quote Locator
//!
//! Find a quote in a PDF whose text layer arrives as disjoint fragments,
//! page by page and out of order, and highlight exactly the matched
//! characters.
//!
//! ## Core Features
//!
//! - **Normalization**: whitespace, curly quotes, dashes and ligatures are
//!   canonicalized with a byte-exact mapping back to the source text
//! - **Cross-fragment matching**: the first case-insensitive occurrence on a
//!   page, split back into per-fragment ranges in original offsets
//! - **Safe highlighting**: fragments rendered as escaped HTML with the match
//!   wrapped in `<mark class="pdf-highlight">`
//! - **Session coordination**: one found / not-found verdict and one scroll
//!   per query, however the renderer orders its page events
//!
//! ## Architecture
//!
//! The matcher and renderer are pure functions. The
//! [`PageScanCoordinator`](session::PageScanCoordinator) owns all session
//! state and reaches the viewer only through the
//! [`ResultSink`](session::ResultSink) and
//! [`PageLayerLookup`](session::PageLayerLookup) traits.
//!
//! ## Quick Start
//!
//! ```
//! use pdf_quote_locator::layer::RenderedTextLayer;
//! use pdf_quote_locator::search::fragments_from_strs;
//! use pdf_quote_locator::session::{PageScanCoordinator, RecordedResults};
//!
//! let page_one = fragments_from_strs(&["The \u{FB01}rst ", "step is"]);
//! let page_two = fragments_from_strs(&["the hardest."]);
//!
//! let mut coordinator = PageScanCoordinator::new(RecordedResults::new());
//! coordinator.set_page_count(2);
//! coordinator.set_query("first step");
//!
//! // pages may report in any order
//! coordinator.on_text_available(2, &page_two);
//! coordinator.on_text_available(1, &page_one);
//! assert_eq!(coordinator.sink().results(), &[true]);
//!
//! // the viewer paints page 1, then tells the coordinator it is done
//! let mut layer = RenderedTextLayer::new();
//! layer.paint_from(1, &page_one, &coordinator);
//! assert!(coordinator.on_layer_rendered(1, &mut layer));
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Text normalization and matching
pub mod search;
pub mod text;

// Output
pub mod converters;

// Session coordination
pub mod layer;
pub mod session;

// Scripted sessions
pub mod replay;

// Re-exports
pub use config::{HighlightConfig, ScrollAlign};
pub use error::{Error, Result};
pub use search::{find_match_in_page, Fragment, HighlightRange, PageMatch};
pub use session::{PageScanCoordinator, ResultSink, SessionPhase};
