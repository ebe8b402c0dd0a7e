//! Relation query engine
//!
//! A list call runs: parse criteria → build pattern → count → page →
//! materialize. The total count comes from a separate count over the same
//! pattern, so it does not depend on the page window.

use crate::config::RelationsConfig;
use crate::error::{RelationError, Result};
use crate::filter::RelationFilter;
use crate::query::{describe_query, page_query, relation_pattern, EDGE_VAR};
use kgraph_db_core::{object_from_triples, strip_angle_brackets, GraphObject};
use kgraph_db_store::{GraphPattern, TripleStore};
use kgraph_graph_format::JsonLdCodec;
use kgraph_graph_ir::{Term, Triple};
use kgraph_vocab::jsonld;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, trace};

/// One page of query results.
///
/// Serializes as `{"@context"?, "items", "totalCount", "pageSize", "offset"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationPage<T> {
    /// Shared context of the materialized items
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<JsonValue>,
    pub items: Vec<T>,
    /// Matches across all pages
    pub total_count: usize,
    pub page_size: usize,
    pub offset: usize,
}

impl<T> RelationPage<T> {
    /// Whether pages after this one hold more matches
    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total_count
    }
}

/// Queries and mutates relations held in a triple store.
///
/// Holds no locks of its own; consistency under concurrent writers is the
/// store's concern.
#[derive(Clone)]
pub struct RelationEngine {
    pub(crate) store: Arc<dyn TripleStore>,
    pub(crate) codec: JsonLdCodec,
    pub(crate) config: RelationsConfig,
}

impl std::fmt::Debug for RelationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationEngine")
            .field("codec", &self.codec)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RelationEngine {
    pub fn new(store: Arc<dyn TripleStore>, codec: JsonLdCodec, config: RelationsConfig) -> Self {
        Self {
            store,
            codec,
            config,
        }
    }

    pub fn config(&self) -> &RelationsConfig {
        &self.config
    }

    pub fn codec(&self) -> &JsonLdCodec {
        &self.codec
    }

    /// The graph pattern a filter resolves to.
    pub fn relation_pattern(&self, filter: &RelationFilter) -> Result<GraphPattern> {
        let criteria = filter.criteria()?;
        let edge_types = self.codec.classes().edge_types();
        Ok(relation_pattern(
            &criteria,
            &edge_types,
            &self.config.search_properties,
        ))
    }

    /// One page of matching edge identifiers, ordered by identifier.
    #[tracing::instrument(
        level = "debug",
        name = "relations.list_ids",
        skip_all,
        fields(direction = %filter.direction, total_count = tracing::field::Empty)
    )]
    pub fn list_relation_ids(&self, filter: &RelationFilter) -> Result<RelationPage<String>> {
        let page = filter.pagination(&self.config)?;
        let pattern = self.relation_pattern(filter)?;

        let total_count = self.store.count(&pattern, EDGE_VAR)?;
        tracing::Span::current().record("total_count", total_count);

        let query = page_query(pattern, page);
        trace!(sparql = %query, "relation page query");
        let ids = self
            .store
            .query_pattern(&query)?
            .into_iter()
            .filter_map(|row| row.get(EDGE_VAR).and_then(|t| t.as_iri()).map(str::to_string))
            .collect::<Vec<_>>();

        debug!(
            returned = ids.len(),
            total_count,
            page_size = page.size,
            offset = page.offset,
            "listed relations"
        );
        Ok(RelationPage {
            context: None,
            items: ids,
            total_count,
            page_size: page.size,
            offset: page.offset,
        })
    }

    /// One page of matching edges as JSON-LD objects sharing one context.
    #[tracing::instrument(level = "debug", name = "relations.list", skip_all)]
    pub fn list_relations(&self, filter: &RelationFilter) -> Result<RelationPage<JsonValue>> {
        let ids = self.list_relation_ids(filter)?;

        let mut edges = Vec::with_capacity(ids.items.len());
        for id in &ids.items {
            match self.fetch_object(id)? {
                Some(edge) => edges.push(edge),
                // Deleted between the page query and the fetch
                None => debug!(id = %id, "relation vanished before materialization"),
            }
        }

        let (context, items) = split_document(self.codec.to_jsonld_list(&edges)?);
        Ok(RelationPage {
            context,
            items,
            total_count: ids.total_count,
            page_size: ids.page_size,
            offset: ids.offset,
        })
    }

    /// Load the stored object with identifier `id`, if it has any triples.
    pub fn fetch_object(&self, id: &str) -> Result<Option<GraphObject>> {
        let id = strip_angle_brackets(id);
        let triples = self.stored_triples(id)?;
        if triples.is_empty() {
            return Ok(None);
        }
        let pairs = triples.iter().map(|t| (&t.p, &t.o));
        let object = object_from_triples(id, pairs, self.codec.classes())?;
        Ok(Some(object))
    }

    /// Every stored triple with subject `id`, as stored.
    pub(crate) fn stored_triples(&self, id: &str) -> Result<Vec<Triple>> {
        let subject = Term::iri(id);
        let triples = self
            .store
            .query_pattern(&describe_query(id))?
            .into_iter()
            .filter_map(|mut row| {
                let p = row.remove("p")?;
                let o = row.remove("o")?;
                Some(Triple::new(subject.clone(), p, o))
            })
            .collect();
        Ok(triples)
    }

    /// Load an edge; anything that is not an edge counts as not found.
    pub fn fetch_edge(&self, id: &str) -> Result<GraphObject> {
        match self.fetch_object(id)? {
            Some(object) if object.as_edge().is_some() => Ok(object),
            Some(_) => {
                debug!(id = %id, "identifier exists but is not an edge");
                Err(RelationError::NotFound(strip_angle_brackets(id).to_string()))
            }
            None => Err(RelationError::NotFound(strip_angle_brackets(id).to_string())),
        }
    }

    /// Whether any triple has `id` as its subject
    pub fn exists(&self, id: &str) -> Result<bool> {
        let query = describe_query(strip_angle_brackets(id)).limit(1);
        Ok(!self.store.query_pattern(&query)?.is_empty())
    }
}

/// Split a `{"@context", "@graph"}` document into its two halves.
fn split_document(doc: JsonValue) -> (Option<JsonValue>, Vec<JsonValue>) {
    match doc {
        JsonValue::Object(mut map) => {
            let context = map.remove(jsonld::CONTEXT);
            let items = match map.remove(jsonld::GRAPH) {
                Some(JsonValue::Array(items)) => items,
                _ => Vec::new(),
            };
            (context, items)
        }
        _ => (None, Vec::new()),
    }
}
