//! Search sessions over asynchronously rendered documents.
//!
//! A session is one query over one document. The [`PageScanCoordinator`]
//! owns the session's match table and latches, consumes per-page
//! text-available and layer-rendered events in any order, and talks to the
//! viewer through the traits in [`collaborators`].

pub mod collaborators;
mod coordinator;
mod match_table;

pub use collaborators::{PageLayerLookup, RecordedResults, ResultSink};
pub use coordinator::{PageScanCoordinator, SessionPhase};
pub use match_table::MatchTable;
