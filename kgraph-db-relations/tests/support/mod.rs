#![allow(dead_code)]

pub mod tracing;

use kgraph_db_core::{
    object_to_triples, ClassRegistry, GraphObject, MemoryPrefixRegistry, ObjectKind,
};
use kgraph_db_relations::{RelationEngine, RelationsConfig};
use kgraph_db_store::{MemoryTripleStore, TripleStore};
use kgraph_graph_format::JsonLdCodec;
use kgraph_vocab::kg;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

pub const E1: &str = "http://example.org/people/ada";
pub const E2: &str = "http://example.org/orgs/acme";
pub const E3: &str = "http://example.org/people/grace";

pub const WORKS_FOR: &str = "urn:kg:rel:worksFor";
pub const KNOWS: &str = "urn:kg:rel:knows";

pub fn codec() -> JsonLdCodec {
    JsonLdCodec::new(
        Arc::new(
            MemoryPrefixRegistry::well_known()
                .with_prefix("rel", "urn:kg:rel:")
                .with_prefix("people", "http://example.org/people/"),
        ),
        Arc::new(ClassRegistry::with_core_classes()),
    )
}

/// Engine over a fresh in-memory store; the store is returned for inspection.
pub fn engine() -> (RelationEngine, Arc<MemoryTripleStore>) {
    engine_with_config(RelationsConfig::default())
}

pub fn engine_with_config(config: RelationsConfig) -> (RelationEngine, Arc<MemoryTripleStore>) {
    let store = Arc::new(MemoryTripleStore::new());
    let engine = RelationEngine::new(store.clone(), codec(), config);
    (engine, store)
}

/// Store an entity directly; the relation layer only creates edges.
pub fn insert_entity(store: &MemoryTripleStore, id: &str, name: &str) {
    let entity = GraphObject::new(id, kg::ENTITY, ObjectKind::Entity).with(kg::NAME, name);
    store.insert(&object_to_triples(&entity)).unwrap();
}

pub fn edge_doc(id: &str, source: &str, destination: &str, relation_type: &str) -> JsonValue {
    json!({
        "@context": {"kg": kg::NS},
        "@id": id,
        "@type": "kg:Edge",
        "kg:source": {"@id": source},
        "kg:destination": {"@id": destination},
        "kg:relationType": {"@id": relation_type}
    })
}

pub fn edge_id(n: u32) -> String {
    format!("http://example.org/relations/r{}", n)
}

/// Create `(source, destination, relation type)` edges named r1, r2, ...
pub fn seed(engine: &RelationEngine, edges: &[(&str, &str, &str)]) -> Vec<String> {
    edges
        .iter()
        .enumerate()
        .map(|(i, (s, d, r))| {
            let id = edge_id(i as u32 + 1);
            let created = engine.create(&edge_doc(&id, s, d, r)).unwrap();
            assert!(created.is_complete(), "{:?}", created.failed);
            id
        })
        .collect()
}

/// Route `tracing` output to the test writer, filtered by `RUST_LOG`.
pub fn init_log() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
