use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonLdError {
    #[error("Invalid context: {message}")]
    InvalidContext { message: String },

    #[error("Invalid IRI: {iri}")]
    InvalidIri { iri: String },

    #[error("Invalid IRI mapping for term '{term}'")]
    InvalidIriMapping { term: String },

    #[error("Cannot expand '{term}': prefix not defined in context")]
    Unresolvable { term: String },
}

pub type Result<T> = std::result::Result<T, JsonLdError>;
