//! Error types for the quote locator.
//!
//! Matching, rendering and session coordination are total and never fail;
//! errors only arise at the edges of the crate, when replay scripts are read,
//! parsed or validated.

/// Result type alias for quote locator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading or running a replay script.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Script is structurally valid JSON but describes an impossible session
    #[error("Invalid script: {0}")]
    InvalidScript(String),

    /// An event refers to a page the script does not describe
    #[error("Unknown page {page} (document has {page_count} pages)")]
    UnknownPage {
        /// Page number named by the event
        page: u32,
        /// Number of pages in the document
        page_count: u32,
    },

    /// Page key in a script is not a positive page number
    #[error("Invalid page key '{0}': expected a page number starting at 1")]
    InvalidPageKey(String),
}
