//! Triple store access for kgraph
//!
//! - [`TripleStore`]: insert / delete-by-subject / select / count
//! - [`GraphPattern`], [`SelectQuery`], [`Expression`]: the query algebra,
//!   renderable as SPARQL
//! - [`MemoryTripleStore`]: an in-memory implementation

mod error;
pub mod expression;
mod memory;
pub mod pattern;
mod store;

pub use error::{Result, StoreError};
pub use expression::{Expression, Function};
pub use memory::MemoryTripleStore;
pub use pattern::{GraphPattern, OrderBy, Pattern, PatternTerm, SelectQuery, Solution, TriplePattern};
pub use store::TripleStore;
