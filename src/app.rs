//! Application model: profile data, link cursor, filters and overlay state.

mod model;

pub use model::*;
