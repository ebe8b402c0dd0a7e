//! Relation (edge) queries and CRUD over a kgraph triple store
//!
//! [`RelationEngine`] ties a [`TripleStore`](kgraph_db_store::TripleStore)
//! to a [`JsonLdCodec`](kgraph_graph_format::JsonLdCodec):
//!
//! - **Query**: [`RelationEngine::list_relations`] and
//!   [`RelationEngine::list_relation_ids`] take a [`RelationFilter`] and
//!   return a [`RelationPage`] whose `totalCount` is independent of the
//!   page window
//! - **CRUD**: [`create`](RelationEngine::create), [`read`](RelationEngine::read),
//!   [`update`](RelationEngine::update), [`upsert`](RelationEngine::upsert),
//!   [`delete`](RelationEngine::delete)
//!
//! # Example
//!
//! ```
//! use kgraph_db_core::{ClassRegistry, MemoryPrefixRegistry};
//! use kgraph_db_relations::{Direction, RelationEngine, RelationFilter, RelationsConfig};
//! use kgraph_db_store::MemoryTripleStore;
//! use kgraph_graph_format::JsonLdCodec;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let codec = JsonLdCodec::new(
//!     Arc::new(MemoryPrefixRegistry::well_known()),
//!     Arc::new(ClassRegistry::with_core_classes()),
//! );
//! let engine = RelationEngine::new(
//!     Arc::new(MemoryTripleStore::new()),
//!     codec,
//!     RelationsConfig::default(),
//! );
//!
//! engine.create(&json!({
//!     "@id": "http://example.org/r1",
//!     "@type": "kg:Edge",
//!     "kg:source": {"@id": "http://example.org/ada"},
//!     "kg:destination": {"@id": "http://example.org/acme"},
//!     "kg:relationType": {"@id": "http://example.org/worksFor"}
//! })).unwrap();
//!
//! let page = engine
//!     .list_relation_ids(
//!         &RelationFilter::new()
//!             .source("http://example.org/ada")
//!             .direction(Direction::Outgoing),
//!     )
//!     .unwrap();
//! assert_eq!(page.items, vec!["http://example.org/r1".to_string()]);
//! assert_eq!(page.total_count, 1);
//! ```

pub mod config;
mod crud;
mod engine;
mod error;
mod filter;
pub mod query;

pub use config::{ConfigFileError, RelationsConfig};
pub use crud::{DeleteReport, UpsertOutcome};
pub use engine::{RelationEngine, RelationPage};
pub use error::{RelationError, Result};
pub use filter::{Criteria, Direction, Pagination, RelationFilter};
