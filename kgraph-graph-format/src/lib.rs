//! JSON-LD codecs for graph objects
//!
//! - **Context builder**: the minimal `@context` for a set of objects
//! - **Single-object codec**: [`JsonLdCodec::to_jsonld`] / [`JsonLdCodec::from_jsonld`]
//! - **Document codec**: [`JsonLdCodec::to_jsonld_list`] /
//!   [`JsonLdCodec::from_jsonld_list`] over `{"@context": ..., "@graph": [...]}`
//!
//! # Example
//!
//! ```
//! use kgraph_db_core::{ClassRegistry, GraphObject, MemoryPrefixRegistry, ObjectKind};
//! use kgraph_graph_format::JsonLdCodec;
//! use kgraph_vocab::kg;
//! use std::sync::Arc;
//!
//! let codec = JsonLdCodec::new(
//!     Arc::new(MemoryPrefixRegistry::well_known()),
//!     Arc::new(ClassRegistry::with_core_classes()),
//! );
//! let ada = GraphObject::new("http://example.org/ada", kg::ENTITY, ObjectKind::Entity)
//!     .with(kg::NAME, "Ada");
//!
//! let doc = codec.to_jsonld_list(&[ada.clone()]).unwrap();
//! let back = codec.from_jsonld_list(&doc, None).unwrap();
//! assert_eq!(back.succeeded, vec![ada]);
//! ```

mod codec;
mod context;
mod document;
mod error;
mod value;

pub use codec::JsonLdCodec;
pub use context::{build_context, collect_namespaces, NamespaceContext};
pub use document::extract_identifier;
pub use error::{fragment, CodecError, Result};
pub use value::{encode_value, encode_values};
