//! The in-memory music catalog and its JSON-backed store.
//!
//! `Catalog` indexes tracks by id and by genre. It is filled from one
//! `TrackSource` at start-up and then mutated by favorites, plays, deletes and
//! merged search results.

mod id;
mod index;
mod model;
mod store;

pub use id::{genre_source_id, path_id};
pub use index::*;
pub use model::*;
pub use store::*;

#[cfg(test)]
mod tests;
