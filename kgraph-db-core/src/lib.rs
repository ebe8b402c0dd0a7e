//! Core object model for the kgraph knowledge-graph store
//!
//! - [`GraphObject`]: a typed node or edge with multi-valued properties
//! - [`ClassRegistry`]: type IRI → object variant, and property ranges
//! - [`PrefixRegistry`]: namespace → short prefix lookup
//! - [`BatchResult`]: collect-and-continue outcome of batch operations
//! - triple conversion and URI sanitization used before store writes

pub mod batch;
pub mod error;
pub mod object;
pub mod registry;
pub mod sanitize;
pub mod triples;
pub mod value;

pub use batch::{BatchFailure, BatchResult, PartialBatchFailure};
pub use error::{Error, RegistryError, Result};
pub use object::{Edge, GraphObject, ObjectKind};
pub use registry::{ClassRegistry, MemoryPrefixRegistry, PrefixRegistry};
pub use sanitize::{sanitize_object, sanitize_uri, strip_angle_brackets};
pub use triples::{object_from_triples, object_to_triples};
pub use value::{GeoPoint, PropertyValue, ValueKind};
