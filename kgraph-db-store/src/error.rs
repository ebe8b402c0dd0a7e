//! Error types for kgraph-db-store

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Triple store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store could not be reached or refused the call
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Pattern is not executable (e.g. unknown projection variable)
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Triple rejected on insert
    #[error("Invalid triple: {0}")]
    InvalidTriple(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        StoreError::Unavailable(msg.into())
    }

    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        StoreError::InvalidPattern(msg.into())
    }
}
