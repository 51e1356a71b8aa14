//! Local filesystem producer.
//!
//! Walks a music directory, reads tags with `lofty` and files every track
//! under the name of the directory that holds it.

mod scan;

pub use scan::*;
