//! Error types for kgraph-db-relations

use crate::config::ConfigFileError;
use kgraph_db_core::PartialBatchFailure;
use kgraph_db_store::StoreError;
use kgraph_graph_format::CodecError;
use thiserror::Error;

/// Result type alias using our RelationError
pub type Result<T> = std::result::Result<T, RelationError>;

/// Errors raised by relation queries and CRUD
#[derive(Error, Debug)]
pub enum RelationError {
    /// Page size or offset outside the accepted range
    #[error("Invalid pagination: {message}")]
    InvalidPagination { message: String },

    /// No edge with this identifier
    #[error("Relation not found: <{0}>")]
    NotFound(String),

    /// Object lacks edge structure or is not typed as an edge
    #[error("<{id}> is not an edge; missing {}", .missing.join(", "))]
    NotAnEdge { id: String, missing: Vec<String> },

    /// Create targeted an identifier that already has triples
    #[error("Relation already exists: <{0}>")]
    AlreadyExists(String),

    /// Document carries no identifier
    #[error("Missing identifier in: {0}")]
    MissingIdentifier(String),

    /// URI still malformed after stripping angle brackets
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Strict batch conversion where some members failed
    #[error(transparent)]
    PartialBatchFailure(#[from] PartialBatchFailure),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Stored triples could not be turned back into an object
    #[error("Object error: {0}")]
    Object(#[from] kgraph_db_core::Error),

    #[error(transparent)]
    Config(#[from] ConfigFileError),
}

impl RelationError {
    pub fn invalid_pagination(message: impl Into<String>) -> Self {
        RelationError::InvalidPagination {
            message: message.into(),
        }
    }

    /// Identifier this error is about, when it names one
    pub fn id(&self) -> Option<&str> {
        match self {
            RelationError::NotFound(id)
            | RelationError::AlreadyExists(id)
            | RelationError::NotAnEdge { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Sanitization failures surface as [`RelationError::InvalidIri`].
    pub(crate) fn from_sanitize(err: kgraph_db_core::Error) -> Self {
        match err {
            kgraph_db_core::Error::InvalidIri(iri) => RelationError::InvalidIri(iri),
            other => RelationError::Object(other),
        }
    }
}
