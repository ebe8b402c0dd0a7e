//! Single-object codec
//!
//! [`JsonLdCodec`] carries everything a conversion needs: the prefix
//! registry (namespaces → prefixes, and the default context for input that
//! brings none) and the class registry (type → object variant, property
//! ranges). Conversions never retain their inputs.

use crate::context::{aliased_context, build_context, NamespaceContext};
use crate::error::{fragment, CodecError, Result};
use crate::value::{encode_values, ValueDecoder};
use kgraph_db_core::{ClassRegistry, GraphObject, PrefixRegistry};
use kgraph_graph_json_ld::{
    expand, is_document, ContextCompactor, ContextEntry, ParsedContext, TypeValue,
};
use kgraph_vocab::jsonld;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing::trace;

/// Graph object ⇄ JSON-LD converter
#[derive(Debug, Clone)]
pub struct JsonLdCodec {
    prefixes: Arc<dyn PrefixRegistry>,
    classes: Arc<ClassRegistry>,
}

impl JsonLdCodec {
    pub fn new(prefixes: Arc<dyn PrefixRegistry>, classes: Arc<ClassRegistry>) -> Self {
        Self { prefixes, classes }
    }

    pub fn prefixes(&self) -> &dyn PrefixRegistry {
        self.prefixes.as_ref()
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Minimal context for a set of objects.
    pub fn build_context<'a>(
        &self,
        objects: impl IntoIterator<Item = &'a GraphObject>,
    ) -> Result<NamespaceContext> {
        build_context(objects, self.prefixes.as_ref())
    }

    /// Context applied to input without its own `@context`: every registered
    /// prefix plus the `id`/`type` aliases.
    pub fn default_context(&self) -> Result<ParsedContext> {
        let mut ctx = aliased_context();
        for (prefix, namespace) in self.prefixes.entries()? {
            ctx.terms.insert(
                prefix,
                ContextEntry {
                    id: Some(namespace),
                    type_: None,
                },
            );
        }
        Ok(ctx)
    }

    /// Convert one object to a JSON-LD object carrying its own context.
    ///
    /// ```
    /// use kgraph_db_core::{ClassRegistry, GraphObject, MemoryPrefixRegistry};
    /// use kgraph_graph_format::JsonLdCodec;
    /// use kgraph_vocab::kg;
    /// use std::sync::Arc;
    ///
    /// let codec = JsonLdCodec::new(
    ///     Arc::new(MemoryPrefixRegistry::well_known()),
    ///     Arc::new(ClassRegistry::with_core_classes()),
    /// );
    /// let edge = GraphObject::edge(
    ///     "http://example.org/r1",
    ///     kg::EDGE,
    ///     "http://example.org/e1",
    ///     "http://example.org/e2",
    ///     "urn:kg:rel:worksFor",
    /// );
    /// let json = codec.to_jsonld(&edge).unwrap();
    /// assert_eq!(json["@type"], "kg:Edge");
    /// assert_eq!(json["kg:source"]["@id"], "http://example.org/e1");
    /// ```
    pub fn to_jsonld(&self, object: &GraphObject) -> Result<JsonValue> {
        let ctx = self.build_context([object])?;
        let mut node = Map::new();
        node.insert(jsonld::CONTEXT.to_string(), ctx.to_json());
        node.extend(encode_node(object, &ctx.compactor()));
        Ok(JsonValue::Object(node))
    }

    /// Convert one JSON-LD object to a graph object.
    ///
    /// `type_hint` decides the variant only when the object has no type, or
    /// when its type is not registered. It never replaces a stated type.
    pub fn from_jsonld(&self, doc: &JsonValue, type_hint: Option<&str>) -> Result<GraphObject> {
        let map = match doc {
            _ if is_document(doc) => {
                return Err(CodecError::input_shape(
                    doc,
                    "document with @graph passed to from_jsonld; use from_jsonld_list",
                ))
            }
            JsonValue::Object(map) => map,
            JsonValue::Array(_) => {
                return Err(CodecError::input_shape(
                    doc,
                    "array passed to from_jsonld; use from_jsonld_list",
                ))
            }
            _ => return Err(CodecError::input_shape(doc, "expected a JSON-LD object")),
        };
        let default = self.default_context()?;
        self.decode_node(map, &default, type_hint)
    }

    /// The identifier of one JSON-LD object, expanded as
    /// [`from_jsonld`](Self::from_jsonld) would expand it, without decoding
    /// the rest of the object.
    pub fn resolve_identifier(&self, doc: &JsonValue) -> Result<Option<String>> {
        let Some(map) = doc.as_object() else {
            return Ok(None);
        };
        let default = self.default_context()?;
        let ctx = match map.get(jsonld::CONTEXT) {
            Some(local) => ParsedContext::parse(Some(&default), local)?,
            None => default,
        };
        Ok(read_identifier(map, &ctx))
    }

    /// Decode a node object against an outer context, layering the node's
    /// own `@context` on top.
    pub(crate) fn decode_node(
        &self,
        map: &Map<String, JsonValue>,
        outer: &ParsedContext,
        type_hint: Option<&str>,
    ) -> Result<GraphObject> {
        let layered;
        let ctx = match map.get(jsonld::CONTEXT) {
            Some(local) => {
                layered = ParsedContext::parse(Some(outer), local)?;
                &layered
            }
            None => outer,
        };

        let node = JsonValue::Object(map.clone());
        let id = read_identifier(map, ctx)
            .ok_or_else(|| CodecError::MissingIdentifier {
                fragment: fragment(&node),
            })?;
        let mut object = self.instantiate(map, ctx, &id, type_hint)?;

        let decoder = ValueDecoder {
            ctx,
            classes: &self.classes,
            id: &id,
        };
        for (key, value) in map {
            if key.starts_with('@') || ctx.is_id_key(key) || ctx.is_type_key(key) {
                continue;
            }
            let (property, coercion) = expand_key(key, ctx)?;
            let values = decoder.decode_all(&property, coercion.as_ref(), value)?;
            trace!(id = %id, property = %property, count = values.len(), "decoded property");
            for value in values {
                object.add(property.clone(), value);
            }
        }
        Ok(object)
    }

    fn instantiate(
        &self,
        map: &Map<String, JsonValue>,
        ctx: &ParsedContext,
        id: &str,
        type_hint: Option<&str>,
    ) -> Result<GraphObject> {
        let stated = read_types(map, ctx)?;

        let Some(first) = stated.first() else {
            let hint = type_hint.ok_or_else(|| CodecError::MissingType { id: id.to_string() })?;
            return self
                .classes
                .instantiate(id, hint)
                .ok_or_else(|| CodecError::UnknownType {
                    type_iri: hint.to_string(),
                });
        };

        // The first registered type wins; unregistered ones fall back to the hint's variant
        if let Some(object) = stated
            .iter()
            .find_map(|t| self.classes.instantiate(id, t))
        {
            return Ok(object);
        }
        match type_hint.and_then(|hint| self.classes.kind_of(hint)) {
            Some(kind) => Ok(GraphObject::new(id, first.clone(), kind)),
            None => Err(CodecError::UnknownType {
                type_iri: first.clone(),
            }),
        }
    }
}

/// A node's members without `@context`: `@id`, compacted `@type`, and
/// compacted property keys in IRI order.
pub(crate) fn encode_node(object: &GraphObject, compactor: &ContextCompactor) -> Map<String, JsonValue> {
    let mut node = Map::new();
    node.insert(jsonld::ID.to_string(), JsonValue::String(object.id.clone()));
    node.insert(
        jsonld::TYPE.to_string(),
        JsonValue::String(compactor.compact_vocab(&object.type_iri)),
    );
    for (property, values) in object.properties() {
        node.insert(compactor.compact_vocab(property), encode_values(values));
    }
    node
}

/// The identifier of a node, expanded against `ctx`.
fn read_identifier(map: &Map<String, JsonValue>, ctx: &ParsedContext) -> Option<String> {
    let raw = map
        .iter()
        .find(|(key, _)| ctx.is_id_key(key))
        .and_then(|(_, v)| v.as_str())
        .filter(|s| !s.trim().is_empty())?;
    Some(expand::iri(raw, ctx, false))
}

/// Stated types, expanded. A type that cannot be expanded is an error.
fn read_types(map: &Map<String, JsonValue>, ctx: &ParsedContext) -> Result<Vec<String>> {
    let Some((_, value)) = map.iter().find(|(key, _)| ctx.is_type_key(key)) else {
        return Ok(Vec::new());
    };
    let raw: Vec<&str> = match value {
        JsonValue::String(s) => vec![s.as_str()],
        JsonValue::Array(items) => items.iter().filter_map(JsonValue::as_str).collect(),
        JsonValue::Null => Vec::new(),
        other => {
            return Err(CodecError::input_shape(other, "@type must be a string or array of strings"))
        }
    };
    raw.into_iter()
        .map(|t| {
            expand::try_iri(t, ctx, true).map_err(|_| CodecError::UnresolvableContext {
                key: t.to_string(),
            })
        })
        .collect()
}

/// Expand a property key, returning the term's type coercion if it has one.
fn expand_key(key: &str, ctx: &ParsedContext) -> Result<(String, Option<TypeValue>)> {
    let unresolvable = || CodecError::UnresolvableContext {
        key: key.to_string(),
    };
    let property = expand::try_iri(key, ctx, true).map_err(|_| unresolvable())?;
    if property.starts_with('@') {
        return Err(unresolvable());
    }
    let coercion = expand::details(key, ctx, true).1.and_then(|e| e.type_);
    Ok((property, coercion))
}
