//! Output formatting for classification results.
//!
//! Two renderings of the same data:
//! - Terminal: human-readable output with colors and box drawing
//! - JSON: machine-readable serialization for HTTP handlers and batch jobs

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::format_decision;
