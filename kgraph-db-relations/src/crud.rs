//! Relation create / read / update / upsert / delete
//!
//! Batch creation is collect-and-continue: each edge is sanitized, checked
//! and inserted on its own, and a failing edge never rolls back the others.
//! Single-edge operations fail the whole call on the first error.

use crate::engine::RelationEngine;
use crate::error::{RelationError, Result};
use kgraph_db_core::{
    object_to_triples, sanitize_object, sanitize_uri, strip_angle_brackets, BatchResult,
    ClassRegistry, GraphObject,
};
use kgraph_graph_format::fragment;
use kgraph_vocab::kg;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

/// Outcome of [`RelationEngine::upsert`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    pub id: String,
    /// False when an existing edge was replaced
    pub created: bool,
}

/// Outcome of [`RelationEngine::delete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReport {
    pub requested: usize,
    /// Identifiers that actually had triples
    pub deleted_count: usize,
}

impl RelationEngine {
    /// Create every edge in a document, bare array, or single object.
    ///
    /// Returns the created identifiers plus one failure per entry that did
    /// not decode, was not edge-shaped, or already existed.
    #[tracing::instrument(
        level = "debug",
        name = "relations.create",
        skip_all,
        fields(created = tracing::field::Empty, failed = tracing::field::Empty)
    )]
    pub fn create(&self, input: &JsonValue) -> Result<BatchResult<String>> {
        let decoded = self
            .codec
            .from_jsonld_list(input, Some(self.config.edge_class.as_str()))?;
        let (objects, decode_failures) = decoded.into_indexed();

        let mut result = BatchResult::new();
        result.failed = decode_failures;
        for (index, object) in objects {
            let id = object.id.clone();
            match self.create_edge(object) {
                Ok(created) => result.push_ok(created),
                Err(err) => {
                    warn!(id = %id, index, error = %err, "relation not created");
                    result.push_err(index, Some(id), err);
                }
            }
        }
        result.failed.sort_by_key(|f| f.index);

        let span = tracing::Span::current();
        span.record("created", result.succeeded.len());
        span.record("failed", result.failed.len());
        Ok(result)
    }

    /// [`create`](Self::create), failing unless every entry succeeded.
    pub fn create_all(&self, input: &JsonValue) -> Result<Vec<String>> {
        Ok(self.create(input)?.into_result()?)
    }

    /// The edge with identifier `id` as a single JSON-LD object.
    #[tracing::instrument(level = "debug", name = "relations.read", skip(self))]
    pub fn read(&self, id: &str) -> Result<JsonValue> {
        let edge = self.fetch_edge(id)?;
        Ok(self.codec.to_jsonld(&edge)?)
    }

    /// Replace an existing edge's properties with those of `doc`.
    ///
    /// Structural fields the document leaves out keep their stored values;
    /// every other stored property not in the document is dropped.
    #[tracing::instrument(level = "debug", name = "relations.update", skip_all)]
    pub fn update(&self, doc: &JsonValue) -> Result<String> {
        let id = self.identifier_of(doc)?;
        let existing = self.fetch_edge(&id)?;
        self.replace(existing, doc)
    }

    /// Update when the edge exists, create otherwise.
    #[tracing::instrument(level = "debug", name = "relations.upsert", skip_all)]
    pub fn upsert(&self, doc: &JsonValue) -> Result<UpsertOutcome> {
        let id = self.identifier_of(doc)?;
        match self.fetch_edge(&id) {
            Ok(existing) => Ok(UpsertOutcome {
                id: self.replace(existing, doc)?,
                created: false,
            }),
            Err(RelationError::NotFound(_)) => {
                let object = self
                    .codec
                    .from_jsonld(doc, Some(self.config.edge_class.as_str()))?;
                Ok(UpsertOutcome {
                    id: self.create_edge(object)?,
                    created: true,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Remove every triple about the given identifiers.
    ///
    /// Identifiers with no triples are skipped, not errors.
    #[tracing::instrument(level = "debug", name = "relations.delete", skip_all, fields(requested = ids.len()))]
    pub fn delete(&self, ids: &[&str]) -> Result<DeleteReport> {
        let subjects: Vec<&str> = ids.iter().map(|id| strip_angle_brackets(id)).collect();
        let deleted_count = self.store.delete(&subjects)?;
        debug!(requested = ids.len(), deleted_count, "relations deleted");
        Ok(DeleteReport {
            requested: ids.len(),
            deleted_count,
        })
    }

    /// The document's identifier, expanded against its context, unbracketed
    /// and checked.
    fn identifier_of(&self, doc: &JsonValue) -> Result<String> {
        let raw = self
            .codec
            .resolve_identifier(doc)?
            .ok_or_else(|| RelationError::MissingIdentifier(fragment(doc)))?;
        sanitize_uri(&raw).map_err(RelationError::from_sanitize)
    }

    fn create_edge(&self, object: GraphObject) -> Result<String> {
        let object = sanitize_object(object).map_err(RelationError::from_sanitize)?;
        check_edge(&object, self.codec.classes())?;
        if self.exists(&object.id)? {
            return Err(RelationError::AlreadyExists(object.id));
        }
        let inserted = self.store.insert(&object_to_triples(&object))?;
        debug!(id = %object.id, triples = inserted, "relation created");
        Ok(object.id)
    }

    fn replace(&self, existing: GraphObject, doc: &JsonValue) -> Result<String> {
        // A document without a type keeps the stored one
        let decoded = self.codec.from_jsonld(doc, Some(existing.type_iri.as_str()))?;
        let mut object = sanitize_object(decoded).map_err(RelationError::from_sanitize)?;
        if object.id != existing.id {
            return Err(RelationError::NotFound(object.id));
        }
        for property in kg::EDGE_STRUCTURE {
            if !object.has(property) {
                object.set(property, existing.get(property).to_vec());
            }
        }
        check_edge(&object, self.codec.classes())?;

        let triples = object_to_triples(&object);
        let previous = self.stored_triples(&existing.id)?;
        self.store.delete(&[existing.id.as_str()])?;
        let inserted = match self.store.insert(&triples) {
            Ok(inserted) => inserted,
            Err(err) => {
                warn!(id = %object.id, error = %err, "replacement rejected, restoring stored triples");
                self.store.insert(&previous)?;
                return Err(err.into());
            }
        };
        debug!(
            id = %object.id,
            before = existing.property_count(),
            after = object.property_count(),
            triples = inserted,
            "relation replaced"
        );
        Ok(object.id)
    }
}


/// Edge shape plus a stored type the registry classifies as an edge, so
/// the edge stays readable and listable once inserted.
fn check_edge(object: &GraphObject, classes: &ClassRegistry) -> Result<()> {
    let mut missing: Vec<String> = Vec::new();
    if !object.is_edge() || !classes.is_edge_type(&object.type_iri) {
        missing.push(format!("a registered edge type (has <{}>)", object.type_iri));
    }
    missing.extend(object.missing_edge_fields().into_iter().map(str::to_string));
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RelationError::NotAnEdge {
            id: object.id.clone(),
            missing,
        })
    }
}
