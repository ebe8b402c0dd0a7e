//! Triple-level intermediate representation
//!
//! The triple store speaks in these types; codecs translate between them and
//! graph objects.
//!
//! # Key Design Principles
//!
//! 1. **Expanded IRIs only** - All IRIs are stored in expanded form. Compaction
//!    is handled by the JSON-LD codec at output time.
//!
//! 2. **Explicit datatypes** - Literals always carry a datatype. Plain strings
//!    use `xsd:string`.
//!
//! 3. **Deterministic ordering** - `Triple` is totally ordered (SPO), so a
//!    sorted collection of triples has a stable iteration order.
//!
//! # Example
//!
//! ```
//! use kgraph_graph_ir::{Term, Triple};
//!
//! let triple = Triple::new(
//!     Term::iri("http://example.org/alice"),
//!     Term::iri("https://ns.kgraph.dev/core#name"),
//!     Term::string("Alice"),
//! );
//! assert_eq!(
//!     triple.to_string(),
//!     "<http://example.org/alice> <https://ns.kgraph.dev/core#name> \"Alice\" ."
//! );
//! ```

pub mod datatype;
mod term;
mod triple;

pub use datatype::Datatype;
pub use term::{LiteralValue, Term};
pub use triple::Triple;
