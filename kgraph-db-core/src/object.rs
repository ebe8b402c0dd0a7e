//! Graph objects: typed nodes and edges of the knowledge graph

use crate::value::PropertyValue;
use kgraph_vocab::kg;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The concrete variant of a graph object, decided by its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Entity,
    Frame,
    Slot,
    Edge,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Entity => "entity",
            ObjectKind::Frame => "frame",
            ObjectKind::Slot => "slot",
            ObjectKind::Edge => "edge",
        }
    }

    /// Base class IRI for this kind.
    pub fn class_iri(&self) -> &'static str {
        match self {
            ObjectKind::Entity => kg::ENTITY,
            ObjectKind::Frame => kg::FRAME,
            ObjectKind::Slot => kg::SLOT,
            ObjectKind::Edge => kg::EDGE,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed node or edge, identified by a URI.
///
/// Property keys are full property IRIs. A property is either absent or
/// holds at least one value; empty value lists are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphObject {
    pub id: String,
    pub type_iri: String,
    pub kind: ObjectKind,
    properties: BTreeMap<String, Vec<PropertyValue>>,
}

impl GraphObject {
    pub fn new(id: impl Into<String>, type_iri: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id: id.into(),
            type_iri: type_iri.into(),
            kind,
            properties: BTreeMap::new(),
        }
    }

    /// Create an edge of the given type between two nodes.
    pub fn edge(
        id: impl Into<String>,
        type_iri: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self::new(id, type_iri, ObjectKind::Edge)
            .with(kg::SOURCE, PropertyValue::Uri(source.into()))
            .with(kg::DESTINATION, PropertyValue::Uri(destination.into()))
            .with(kg::RELATION_TYPE, PropertyValue::Uri(relation_type.into()))
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, property: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.add(property, value);
        self
    }

    /// Append a value to a property.
    pub fn add(&mut self, property: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties
            .entry(property.into())
            .or_default()
            .push(value.into());
    }

    /// Replace all values of a property. An empty list removes it.
    pub fn set(&mut self, property: impl Into<String>, values: Vec<PropertyValue>) {
        let property = property.into();
        if values.is_empty() {
            self.properties.remove(&property);
        } else {
            self.properties.insert(property, values);
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<Vec<PropertyValue>> {
        self.properties.remove(property)
    }

    /// All values of a property (empty when absent).
    pub fn get(&self, property: &str) -> &[PropertyValue] {
        self.properties
            .get(property)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn first(&self, property: &str) -> Option<&PropertyValue> {
        self.get(property).first()
    }

    pub fn has(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Properties in IRI order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &[PropertyValue])> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn is_edge(&self) -> bool {
        self.kind == ObjectKind::Edge
    }

    /// Structural edge fields that are missing or not URI valued.
    pub fn missing_edge_fields(&self) -> Vec<&'static str> {
        kg::EDGE_STRUCTURE
            .iter()
            .copied()
            .filter(|p| self.first(p).and_then(PropertyValue::as_uri).is_none())
            .collect()
    }

    /// View this object as an edge, if it is edge-shaped.
    pub fn as_edge(&self) -> Option<Edge<'_>> {
        if !self.is_edge() {
            return None;
        }
        Some(Edge {
            id: &self.id,
            source: self.first(kg::SOURCE)?.as_uri()?,
            destination: self.first(kg::DESTINATION)?.as_uri()?,
            relation_type: self.first(kg::RELATION_TYPE)?.as_uri()?,
        })
    }

    /// Rewrite every property key and URI value through `f`.
    pub(crate) fn map_iris<E>(
        self,
        mut f: impl FnMut(&str) -> std::result::Result<String, E>,
    ) -> std::result::Result<Self, E> {
        let mut out = GraphObject::new(f(&self.id)?, f(&self.type_iri)?, self.kind);
        for (property, values) in self.properties {
            let key = f(&property)?;
            for value in values {
                let value = match value {
                    PropertyValue::Uri(u) => PropertyValue::Uri(f(&u)?),
                    other => other,
                };
                out.add(key.clone(), value);
            }
        }
        Ok(out)
    }
}

/// Borrowed view of the structural fields of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a> {
    pub id: &'a str,
    pub source: &'a str,
    pub destination: &'a str,
    pub relation_type: &'a str,
}

impl Edge<'_> {
    /// True if `uri` is either end of this edge.
    pub fn touches(&self, uri: &str) -> bool {
        self.source == uri || self.destination == uri
    }
}
