//! URI sanitization before triple insertion
//!
//! URIs echoed back from an upstream JSON-LD parser sometimes arrive
//! bracket-quoted (`<http://...>`). Brackets are stripped and the result
//! must be a well-formed absolute IRI.

use crate::error::{Error, Result};
use crate::object::GraphObject;
use kgraph_graph_json_ld::iri;

/// Strip surrounding whitespace and one pair of angle brackets.
pub fn strip_angle_brackets(uri: &str) -> &str {
    let trimmed = uri.trim();
    trimmed
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Strip delimiters and check the URI is well formed.
pub fn sanitize_uri(uri: &str) -> Result<String> {
    let stripped = strip_angle_brackets(uri);
    if iri::is_well_formed(stripped) {
        Ok(stripped.to_string())
    } else {
        Err(Error::invalid_iri(uri))
    }
}

/// Sanitize the identifier, type, property keys and URI values of an object.
pub fn sanitize_object(object: GraphObject) -> Result<GraphObject> {
    object.map_iris(sanitize_uri)
}
