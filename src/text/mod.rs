//! Text canonicalization for matching.
//!
//! Search queries and the text exposed by a PDF text layer differ in
//! typography (quotes, dashes, ligatures) and whitespace. The [`normalize`]
//! family of functions maps both onto one comparable form while keeping
//! enough position information to find the original characters again.

mod normalize;

pub use normalize::{normalize, normalize_fragment, normalize_query, NormalizeMode, NormalizedText};
