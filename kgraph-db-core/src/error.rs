//! Error types for kgraph-db-core

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A property value could not be parsed into its declared kind
    #[error("Invalid value for <{property}>: {message}")]
    InvalidValue { property: String, message: String },

    /// Stored object has no rdf:type
    #[error("Object <{id}> has no rdf:type")]
    MissingType { id: String },

    /// Type IRI is not registered with the class registry
    #[error("Unknown type: <{0}>")]
    UnknownType(String),

    /// URI is not well formed after sanitization
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

impl Error {
    /// Create an invalid value error
    pub fn invalid_value(property: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidValue {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create an invalid IRI error
    pub fn invalid_iri(iri: impl Into<String>) -> Self {
        Error::InvalidIri(iri.into())
    }
}

/// Failure reported by a [`PrefixRegistry`](crate::PrefixRegistry)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry could not be consulted at all
    #[error("Prefix registry unavailable: {0}")]
    Unavailable(String),
}
