//! Error types for kgraph-graph-format

use kgraph_db_core::RegistryError;
use kgraph_graph_json_ld::JsonLdError;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Longest input fragment echoed back in an error
const MAX_FRAGMENT_LEN: usize = 160;

/// Errors raised while converting between graph objects and JSON-LD
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Input has the wrong JSON-LD shape for the called function
    #[error("Wrong JSON-LD shape: {message} (input: {fragment})")]
    InputShape { fragment: String, message: String },

    /// A compacted key whose prefix is neither in the document context
    /// nor in the default context
    #[error("Cannot expand '{key}': prefix not defined in context")]
    UnresolvableContext { key: String },

    /// Type present but not registered, and no hint to fall back on
    #[error("Unknown type: <{type_iri}>")]
    UnknownType { type_iri: String },

    /// A URI scanned for namespaces could not be split or is not well formed
    #[error("Malformed IRI: {iri}")]
    MalformedIri { iri: String },

    #[error("Object has no identifier (input: {fragment})")]
    MissingIdentifier { fragment: String },

    #[error("Object <{id}> has no type and no type hint was given")]
    MissingType { id: String },

    #[error("Invalid value for <{property}> on <{id}>: {message}")]
    InvalidValue {
        id: String,
        property: String,
        message: String,
    },

    /// The document's own `@context` could not be parsed
    #[error("Invalid @context: {0}")]
    InvalidContext(#[from] JsonLdError),

    /// Prefix registry unavailable; fatal for the call
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl CodecError {
    pub(crate) fn input_shape(input: &JsonValue, message: impl Into<String>) -> Self {
        CodecError::InputShape {
            fragment: fragment(input),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_value(
        id: &str,
        property: &str,
        message: impl Into<String>,
    ) -> Self {
        CodecError::InvalidValue {
            id: id.to_string(),
            property: property.to_string(),
            message: message.into(),
        }
    }
}

/// Compact, length-bounded rendering of an input value for error messages.
pub fn fragment(value: &JsonValue) -> String {
    let text = value.to_string();
    if text.len() <= MAX_FRAGMENT_LEN {
        return text;
    }
    let mut end = MAX_FRAGMENT_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}
