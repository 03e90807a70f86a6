//! Server bundle manifest.
//!
//! The manifest is the desired-state half of an import: a YAML document that
//! names the server, its settings and its nested collections.

mod convert;
mod decode;
mod types;

pub use decode::{ManifestError, decode};
pub use types::*;
