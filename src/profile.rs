//! Profile document: the single JSON file describing the owner, their link
//! cards, social media handles and site settings.
//!
//! The document is consumed read-only. Loading failures are surfaced to the
//! UI as retryable errors, never as process exits.

mod load;
mod model;

pub use load::{DataError, load_profile};
pub use model::*;
