//! A single subject-predicate-object statement

use crate::Term;
use serde::{Deserialize, Serialize};

/// An RDF triple
///
/// Ordering is lexicographic over (subject, predicate, object), which is
/// what the store relies on for deterministic scans.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub s: Term,
    pub p: Term,
    pub o: Term,
}

impl Triple {
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o }
    }

    /// Subject IRI, if the subject is an IRI
    pub fn subject_iri(&self) -> Option<&str> {
        self.s.as_iri()
    }

    /// Predicate IRI
    pub fn predicate_iri(&self) -> Option<&str> {
        self.p.as_iri()
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}
