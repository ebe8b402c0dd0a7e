//! Minimal JSON-LD context handling
//!
//! This library provides the JSON-LD pieces the kgraph codecs need:
//! - Context parsing (prefixes, term definitions, `@id`/`@type` aliases,
//!   `null` terms that mask an outer prefix)
//! - IRI expansion (lenient and strict)
//! - IRI compaction with longest-namespace matching
//! - Namespace splitting of absolute IRIs
//!
//! # Example
//!
//! ```
//! use kgraph_graph_json_ld::{expand, ContextCompactor, ParsedContext};
//! use serde_json::json;
//!
//! let ctx = ParsedContext::parse(None, &json!({"kg": "https://ns.kgraph.dev/core#"})).unwrap();
//! assert_eq!(expand::iri("kg:Edge", &ctx, true), "https://ns.kgraph.dev/core#Edge");
//! assert_eq!(
//!     ContextCompactor::new(&ctx).compact_vocab("https://ns.kgraph.dev/core#Edge"),
//!     "kg:Edge"
//! );
//! ```

pub mod compact;
pub mod context;
pub mod error;
pub mod expand;
pub mod iri;

pub use compact::ContextCompactor;
pub use context::{ContextEntry, ParsedContext, TypeValue};
pub use error::{JsonLdError, Result};

use serde_json::Value as JsonValue;

/// Check if a value is shaped like a JSON-LD document (top-level `@graph`).
pub fn is_document(value: &JsonValue) -> bool {
    matches!(value, JsonValue::Object(map) if map.contains_key("@graph"))
}
