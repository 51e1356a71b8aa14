//! Application module: exposes the browser model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the current view over the
//! catalog, the selection and the search prompt.

mod model;

pub use model::*;
