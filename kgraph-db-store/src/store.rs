//! The triple store interface

use crate::error::Result;
use crate::pattern::{GraphPattern, SelectQuery, Solution};
use kgraph_graph_ir::Triple;

/// The four primitives the relation layer needs from a triple store.
///
/// Implementations provide their own consistency for concurrent writers;
/// callers add no locking of their own.
pub trait TripleStore: Send + Sync {
    /// Insert triples; returns how many were not already present.
    fn insert(&self, triples: &[Triple]) -> Result<usize>;

    /// Remove every triple whose subject is one of `subjects`; returns how
    /// many of the subjects had triples.
    fn delete(&self, subjects: &[&str]) -> Result<usize>;

    /// Evaluate a select query with its ordering and slicing.
    fn query_pattern(&self, query: &SelectQuery) -> Result<Vec<Solution>>;

    /// Number of distinct bindings of `var` over all matches of `pattern`.
    fn count(&self, pattern: &GraphPattern, var: &str) -> Result<usize>;
}
