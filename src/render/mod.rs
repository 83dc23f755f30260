//! Rendering module for serializing documents and paginated output.

mod json;
mod stats;
mod text;

pub use json::{pages_to_json, to_json, JsonFormat};
pub use stats::DocumentStats;
pub use text::{pages_to_text, to_text};
