//! Document codec: lists of objects ⇄ `{"@context", "@graph"}`

use crate::codec::{encode_node, JsonLdCodec};
use crate::error::{CodecError, Result};
use kgraph_db_core::{BatchResult, GraphObject};
use kgraph_graph_json_ld::{is_document, ParsedContext};
use kgraph_vocab::jsonld;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

impl JsonLdCodec {
    /// Convert a list of objects to one document with a shared context.
    ///
    /// An empty list gives a context holding only the aliases and an empty
    /// `@graph`.
    pub fn to_jsonld_list(&self, objects: &[GraphObject]) -> Result<JsonValue> {
        let ctx = self.build_context(objects)?;
        let compactor = ctx.compactor();
        let graph: Vec<JsonValue> = objects
            .iter()
            .map(|o| JsonValue::Object(encode_node(o, &compactor)))
            .collect();

        let mut doc = Map::new();
        doc.insert(jsonld::CONTEXT.to_string(), ctx.to_json());
        doc.insert(jsonld::GRAPH.to_string(), JsonValue::Array(graph));
        Ok(JsonValue::Object(doc))
    }

    /// Convert a document, a bare array, or a single object to objects.
    ///
    /// Entry failures are collected in the batch; the call itself only fails
    /// when the input is not one of the three shapes, when a document's
    /// shared `@context` is invalid, or when the prefix registry fails.
    pub fn from_jsonld_list(
        &self,
        input: &JsonValue,
        type_hint: Option<&str>,
    ) -> Result<BatchResult<GraphObject>> {
        let default = self.default_context()?;
        let mut batch = BatchResult::new();

        match input {
            JsonValue::Object(map) if is_document(input) => {
                let shared = match map.get(jsonld::CONTEXT) {
                    Some(ctx) => ParsedContext::parse(Some(&default), ctx)?,
                    None => default,
                };
                let members = match &map[jsonld::GRAPH] {
                    JsonValue::Array(items) => items.as_slice(),
                    single => std::slice::from_ref(single),
                };
                for (index, member) in members.iter().enumerate() {
                    self.decode_member(&mut batch, index, member, &shared, type_hint);
                }
            }
            JsonValue::Object(_) => {
                self.decode_member(&mut batch, 0, input, &default, type_hint);
            }
            JsonValue::Array(items) => {
                for (index, member) in items.iter().enumerate() {
                    if is_document(member) {
                        batch.push_err(
                            index,
                            extract_identifier(member),
                            CodecError::input_shape(member, "nested document in array"),
                        );
                        continue;
                    }
                    self.decode_member(&mut batch, index, member, &default, type_hint);
                }
            }
            other => {
                return Err(CodecError::input_shape(
                    other,
                    "expected a JSON-LD document, array, or object",
                ))
            }
        }

        if batch.has_failures() {
            debug!(
                succeeded = batch.succeeded.len(),
                failed = batch.failed.len(),
                "partial decode"
            );
        }
        Ok(batch)
    }

    fn decode_member(
        &self,
        batch: &mut BatchResult<GraphObject>,
        index: usize,
        member: &JsonValue,
        ctx: &ParsedContext,
        type_hint: Option<&str>,
    ) {
        let result = match member {
            JsonValue::Object(map) => self.decode_node(map, ctx, type_hint),
            other => Err(CodecError::input_shape(other, "graph member is not an object")),
        };
        match result {
            Ok(object) => batch.push_ok(object),
            Err(e) => batch.push_err(index, extract_identifier(member), e),
        }
    }
}

/// Read an object's identifier without decoding it.
///
/// Accepts `@id`, the `id` alias, or an alias declared in the object's own
/// `@context`. The value is returned as written.
pub fn extract_identifier(doc: &JsonValue) -> Option<String> {
    let map = doc.as_object()?;
    let declared_alias = map
        .get(jsonld::CONTEXT)
        .and_then(JsonValue::as_object)
        .and_then(|ctx| {
            ctx.iter()
                .find(|(_, v)| v.as_str() == Some(jsonld::ID))
                .map(|(k, _)| k.as_str())
        });

    [Some(jsonld::ID), declared_alias, Some(jsonld::ID_ALIAS)]
        .into_iter()
        .flatten()
        .find_map(|key| map.get(key).and_then(JsonValue::as_str))
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
}
