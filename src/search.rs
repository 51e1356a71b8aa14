//! Search producer.
//!
//! A `SearchBackend` answers keyword queries with video records; `SearchTask`
//! runs one query on the tokio runtime and merges the results into the
//! catalog under the request's genre.

mod backend;
mod duration;
mod task;

pub use backend::*;
pub use duration::iso8601_seconds;
pub use task::*;

#[cfg(test)]
mod tests;
