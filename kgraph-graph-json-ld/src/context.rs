use crate::error::{JsonLdError, Result};
use crate::iri;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// Type coercion declared for a term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeValue {
    /// @id - value is an IRI reference
    Id,
    /// @vocab - value is an IRI expanded against @vocab
    Vocab,
    /// Specific datatype IRI
    Iri(String),
}

/// A single context entry (term definition)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextEntry {
    /// The expanded IRI (@id)
    pub id: Option<String>,
    /// The datatype (@type)
    pub type_: Option<TypeValue>,
}

/// The fully parsed context
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedContext {
    /// Key used for @id (defaults to "@id", can be aliased)
    pub id_key: String,
    /// Key used for @type (defaults to "@type", can be aliased)
    pub type_key: String,
    /// Default vocabulary (@vocab)
    pub vocab: Option<String>,
    /// Base IRI (@base)
    pub base: Option<String>,
    /// Term definitions (string keys map to entries)
    pub terms: HashMap<String, ContextEntry>,
}

impl ParsedContext {
    pub fn new() -> Self {
        Self {
            id_key: "@id".to_string(),
            type_key: "@type".to_string(),
            ..Default::default()
        }
    }

    /// Get a term entry by key
    pub fn get(&self, key: &str) -> Option<&ContextEntry> {
        self.terms.get(key)
    }

    /// Check if context contains a term
    pub fn contains(&self, key: &str) -> bool {
        self.terms.contains_key(key)
    }

    /// True if `key` names the identifier, either `@id` or an alias of it
    pub fn is_id_key(&self, key: &str) -> bool {
        key == "@id" || key == self.id_key
    }

    /// True if `key` names the type, either `@type` or an alias of it
    pub fn is_type_key(&self, key: &str) -> bool {
        key == "@type" || key == self.type_key
    }

    /// Parse a JSON-LD context value (string, map, array, or null)
    pub fn parse(base_context: Option<&ParsedContext>, context: &JsonValue) -> Result<ParsedContext> {
        let mut active = base_context.cloned().unwrap_or_else(ParsedContext::new);

        if active.id_key.is_empty() {
            active.id_key = "@id".to_string();
        }
        if active.type_key.is_empty() {
            active.type_key = "@type".to_string();
        }

        match context {
            // null resets the context
            JsonValue::Null => Ok(ParsedContext::new()),

            JsonValue::String(s) => {
                if !iri::is_absolute(s) {
                    return Err(JsonLdError::InvalidContext {
                        message: format!("Remote or relative context not supported: {}", s),
                    });
                }
                active.vocab = Some(iri::add_trailing_slash(s));
                Ok(active)
            }

            JsonValue::Object(map) => {
                if let Some(inner) = map.get("@context") {
                    return Self::parse(Some(&active), inner);
                }
                parse_context_map(&active, map)
            }

            JsonValue::Array(arr) => {
                for ctx in arr {
                    active = Self::parse(Some(&active), ctx)?;
                }
                Ok(active)
            }

            _ => Err(JsonLdError::InvalidContext {
                message: format!("Invalid context type: {}", context),
            }),
        }
    }
}

/// Parse a context object (map)
fn parse_context_map(base: &ParsedContext, map: &Map<String, JsonValue>) -> Result<ParsedContext> {
    let mut result = base.clone();

    // First pass: keywords
    for (key, value) in map.iter() {
        match key.as_str() {
            "@vocab" => {
                result.vocab = match value {
                    JsonValue::String(s) => Some(iri::add_trailing_slash(s)),
                    JsonValue::Null => None,
                    _ => {
                        return Err(JsonLdError::InvalidContext {
                            message: format!("@vocab must be a string, got: {}", value),
                        })
                    }
                };
            }
            "@base" => {
                result.base = value.as_str().map(|s| s.to_string());
            }
            _ => {}
        }
    }

    let default_vocab = result.vocab.clone();

    // Second pass: term definitions
    for (key, value) in map.iter() {
        if key.starts_with('@') {
            continue;
        }
        let entry = parse_context_entry(key, value, map, base, default_vocab.as_deref())?;

        if entry.id.as_deref() == Some("@id") {
            result.id_key = key.clone();
        }
        if entry.id.as_deref() == Some("@type") {
            result.type_key = key.clone();
        }

        result.terms.insert(key.clone(), entry);
    }

    Ok(result)
}

/// Recursively resolve term references within the same context
fn recursively_get_id(
    term: &str,
    context: &Map<String, JsonValue>,
    visited: &mut Vec<String>,
) -> Result<String> {
    if visited.iter().any(|v| v == term) {
        return Err(JsonLdError::InvalidIriMapping {
            term: term.to_string(),
        });
    }

    match context.get(term) {
        Some(JsonValue::String(s)) => {
            if s == term {
                return Err(JsonLdError::InvalidIriMapping {
                    term: term.to_string(),
                });
            }
            if !s.contains(':') && !s.starts_with('@') {
                visited.push(term.to_string());
                return recursively_get_id(s, context, visited);
            }
            Ok(s.clone())
        }
        Some(JsonValue::Object(map)) => match map.get("@id") {
            Some(JsonValue::String(id)) => Ok(id.clone()),
            _ => Ok(term.to_string()),
        },
        _ => Ok(term.to_string()),
    }
}

/// Resolve a potentially compact IRI using the context being parsed
fn resolve_compact_iri(
    value: &str,
    context: &Map<String, JsonValue>,
    base_context: &ParsedContext,
    default_vocab: Option<&str>,
) -> String {
    if let Some((prefix, suffix)) = iri::parse_prefix(value) {
        if let Some(prefix_val) = context.get(&prefix) {
            if let Some(prefix_iri) = prefix_val.as_str() {
                return format!("{}{}", prefix_iri, suffix);
            } else if let Some(JsonValue::String(prefix_iri)) =
                prefix_val.as_object().and_then(|m| m.get("@id"))
            {
                return format!("{}{}", prefix_iri, suffix);
            }
        }
        if let Some(prefix_iri) = base_context.terms.get(&prefix).and_then(|e| e.id.as_ref()) {
            return format!("{}{}", prefix_iri, suffix);
        }
    }

    if !value.starts_with('@') && !iri::any_iri(value) {
        if let Some(vocab) = default_vocab {
            return format!("{}{}", vocab, value);
        }
    }

    value.to_string()
}

fn parse_type_value(
    value: &JsonValue,
    context: &Map<String, JsonValue>,
    base_context: &ParsedContext,
    default_vocab: Option<&str>,
) -> Result<Option<TypeValue>> {
    match value {
        JsonValue::String(s) => {
            let resolved = resolve_compact_iri(s, context, base_context, default_vocab);
            match resolved.as_str() {
                "@id" => Ok(Some(TypeValue::Id)),
                "@vocab" => Ok(Some(TypeValue::Vocab)),
                _ => Ok(Some(TypeValue::Iri(resolved))),
            }
        }
        JsonValue::Null => Ok(None),
        _ => Err(JsonLdError::InvalidContext {
            message: format!("@type must be a string, got: {}", value),
        }),
    }
}

/// Parse a single context entry value
fn parse_context_entry(
    key: &str,
    value: &JsonValue,
    original_context: &Map<String, JsonValue>,
    base_context: &ParsedContext,
    default_vocab: Option<&str>,
) -> Result<ContextEntry> {
    match value {
        JsonValue::String(s) => {
            let mut visited = Vec::new();
            let resolved = recursively_get_id(s, original_context, &mut visited)?;
            let iri = resolve_compact_iri(&resolved, original_context, base_context, default_vocab);
            Ok(ContextEntry {
                id: Some(iri),
                type_: None,
            })
        }

        JsonValue::Object(map) => {
            let mut entry = ContextEntry::default();
            if let Some(JsonValue::String(s)) = map.get("@id") {
                entry.id = Some(resolve_compact_iri(
                    s,
                    original_context,
                    base_context,
                    default_vocab,
                ));
            }
            if let Some(t) = map.get("@type") {
                entry.type_ = parse_type_value(t, original_context, base_context, default_vocab)?;
            }
            // A term with only a type coercion is its own compact IRI
            if entry.id.is_none() {
                entry.id = Some(resolve_compact_iri(
                    key,
                    original_context,
                    base_context,
                    default_vocab,
                ));
            }
            Ok(entry)
        }

        JsonValue::Null => Ok(ContextEntry::default()),

        _ => Err(JsonLdError::InvalidContext {
            message: format!("Invalid term definition for '{}': {}", key, value),
        }),
    }
}
