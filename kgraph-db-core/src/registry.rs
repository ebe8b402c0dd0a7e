//! Class and prefix registries
//!
//! Both are owned by the domain catalog. The codecs only consult them:
//! the class registry decides which object variant a type IRI names and
//! which value kind a property holds; the prefix registry names namespaces.

use crate::error::RegistryError;
use crate::object::{GraphObject, ObjectKind};
use crate::value::ValueKind;
use kgraph_vocab::{kg, prefixes, rdfs};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Type IRI → object variant, plus declared property ranges.
///
/// # Example
///
/// ```
/// use kgraph_db_core::{ClassRegistry, ObjectKind};
///
/// let classes = ClassRegistry::with_core_classes()
///     .with_class("http://schema.org/Person", ObjectKind::Entity);
/// let person = classes.instantiate("http://example.org/ada", "http://schema.org/Person");
/// assert_eq!(person.map(|p| p.kind), Some(ObjectKind::Entity));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ObjectKind>,
    ranges: HashMap<String, ValueKind>,
}

impl ClassRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The `kg:` base classes and the URI ranges of the edge structure.
    pub fn with_core_classes() -> Self {
        let mut registry = Self::new();
        for kind in [
            ObjectKind::Entity,
            ObjectKind::Frame,
            ObjectKind::Slot,
            ObjectKind::Edge,
        ] {
            registry.register_class(kind.class_iri(), kind);
        }
        for property in kg::EDGE_STRUCTURE {
            registry.register_range(property, ValueKind::Uri);
        }
        registry.register_range(kg::NAME, ValueKind::String);
        registry.register_range(kg::DESCRIPTION, ValueKind::String);
        registry.register_range(rdfs::LABEL, ValueKind::String);
        registry
    }

    pub fn register_class(&mut self, type_iri: impl Into<String>, kind: ObjectKind) {
        self.classes.insert(type_iri.into(), kind);
    }

    pub fn register_range(&mut self, property: impl Into<String>, kind: ValueKind) {
        self.ranges.insert(property.into(), kind);
    }

    pub fn with_class(mut self, type_iri: impl Into<String>, kind: ObjectKind) -> Self {
        self.register_class(type_iri, kind);
        self
    }

    pub fn with_range(mut self, property: impl Into<String>, kind: ValueKind) -> Self {
        self.register_range(property, kind);
        self
    }

    pub fn kind_of(&self, type_iri: &str) -> Option<ObjectKind> {
        self.classes.get(type_iri).copied()
    }

    pub fn is_known(&self, type_iri: &str) -> bool {
        self.classes.contains_key(type_iri)
    }

    /// Construct an empty object of the variant registered for `type_iri`.
    pub fn instantiate(&self, id: &str, type_iri: &str) -> Option<GraphObject> {
        self.kind_of(type_iri)
            .map(|kind| GraphObject::new(id, type_iri, kind))
    }

    pub fn property_range(&self, property: &str) -> Option<ValueKind> {
        self.ranges.get(property).copied()
    }

    pub fn is_edge_type(&self, type_iri: &str) -> bool {
        self.kind_of(type_iri) == Some(ObjectKind::Edge)
    }

    /// All type IRIs registered as edges, sorted.
    pub fn edge_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self
            .classes
            .iter()
            .filter(|(_, kind)| **kind == ObjectKind::Edge)
            .map(|(iri, _)| iri.as_str())
            .collect();
        types.sort_unstable();
        types
    }
}

/// Namespace → short prefix lookup
pub trait PrefixRegistry: Send + Sync + std::fmt::Debug {
    /// The registered prefix for a namespace, if any.
    fn prefix_for(&self, namespace: &str) -> Result<Option<String>, RegistryError>;

    /// Every registered `(prefix, namespace)` pair, sorted by prefix.
    ///
    /// This is the default context applied to input that carries none.
    fn entries(&self) -> Result<Vec<(String, String)>, RegistryError>;
}

/// In-memory prefix registry.
///
/// Prefixes can be registered at runtime, e.g. after the context builder
/// reported a namespace it had to synthesize a prefix for.
#[derive(Debug, Default)]
pub struct MemoryPrefixRegistry {
    by_namespace: RwLock<BTreeMap<String, String>>,
}

impl MemoryPrefixRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the well-known vocabularies (`kg`, `rdf`, `xsd`, ...).
    pub fn well_known() -> Self {
        let registry = Self::new();
        for (prefix, namespace) in prefixes::WELL_KNOWN {
            registry.register(prefix, namespace);
        }
        registry
    }

    pub fn with_prefix(self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.register(prefix, namespace);
        self
    }

    /// Register (or re-register) the prefix for a namespace.
    pub fn register(&self, prefix: impl Into<String>, namespace: impl Into<String>) {
        let prefix = prefix.into();
        let namespace = namespace.into();
        debug!(prefix = %prefix, namespace = %namespace, "registering prefix");
        self.by_namespace.write().insert(namespace, prefix);
    }

    pub fn len(&self) -> usize {
        self.by_namespace.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_namespace.read().is_empty()
    }
}

impl PrefixRegistry for MemoryPrefixRegistry {
    fn prefix_for(&self, namespace: &str) -> Result<Option<String>, RegistryError> {
        Ok(self.by_namespace.read().get(namespace).cloned())
    }

    fn entries(&self) -> Result<Vec<(String, String)>, RegistryError> {
        let mut entries: Vec<(String, String)> = self
            .by_namespace
            .read()
            .iter()
            .map(|(ns, prefix)| (prefix.clone(), ns.clone()))
            .collect();
        entries.sort();
        Ok(entries)
    }
}
