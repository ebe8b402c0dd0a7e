//! Context builder
//!
//! Scans graph objects for the namespaces they actually use and emits the
//! smallest `@context` that resolves all of them:
//!
//! ```json
//! {"id": "@id", "type": "@type", "kg": "https://ns.kgraph.dev/core#", ...}
//! ```
//!
//! Namespaces come from the type IRI, every property key, and every URI
//! value. The identifier is emitted in full and is not scanned. Datatype
//! IRIs are never compacted, so they never contribute a namespace.
//!
//! Identifiers and URI values are emitted in full, so their schemes must not
//! resolve as prefixes on the way back in. Such a scheme is never assigned,
//! and when the registry defines it (and so the default context does) the
//! context maps it to `null`.

use crate::error::{CodecError, Result};
use kgraph_db_core::{GraphObject, PrefixRegistry, PropertyValue};
use kgraph_graph_json_ld::{iri, ContextCompactor, ContextEntry, ParsedContext};
use kgraph_vocab::jsonld;
use serde_json::{Map, Value as JsonValue};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Prefix names never assigned to a namespace.
///
/// The aliases would shadow the identifier and type keys; URI schemes would
/// make full URIs read as compact IRIs.
const RESERVED_PREFIXES: [&str; 11] = [
    "id", "type", "http", "https", "urn", "did", "mailto", "ftp", "file", "tag", "ipfs",
];

/// Fallback base for synthesized prefixes
const FALLBACK_PREFIX: &str = "ns";

/// A minimal prefix → namespace mapping plus the fixed aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    /// prefix → namespace
    prefixes: BTreeMap<String, String>,
    /// Namespaces that had no registered prefix
    synthesized: Vec<String>,
    /// Registry prefixes mapped to `null` because a reference uses them as its scheme
    masked: BTreeSet<String>,
}

impl NamespaceContext {
    /// Context holding only the `id`/`type` aliases
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn namespace_for(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, ns)| ns.as_str() == namespace)
            .map(|(p, _)| p.as_str())
    }

    /// `(prefix, namespace)` pairs in prefix order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// Namespaces that were given a synthesized prefix, sorted.
    ///
    /// These are the candidates for registration with the prefix registry.
    pub fn synthesized(&self) -> &[String] {
        &self.synthesized
    }

    /// Prefixes the context undefines, sorted.
    pub fn masked(&self) -> impl Iterator<Item = &str> {
        self.masked.iter().map(String::as_str)
    }

    /// The `@context` value.
    pub fn to_json(&self) -> JsonValue {
        let mut ctx = Map::new();
        ctx.insert(
            jsonld::ID_ALIAS.to_string(),
            JsonValue::String(jsonld::ID.to_string()),
        );
        ctx.insert(
            jsonld::TYPE_ALIAS.to_string(),
            JsonValue::String(jsonld::TYPE.to_string()),
        );
        for (prefix, ns) in &self.prefixes {
            ctx.insert(prefix.clone(), JsonValue::String(ns.clone()));
        }
        for prefix in &self.masked {
            ctx.insert(prefix.clone(), JsonValue::Null);
        }
        JsonValue::Object(ctx)
    }

    /// The same mapping as a parsed context, for expansion.
    pub fn to_parsed(&self) -> ParsedContext {
        let mut ctx = aliased_context();
        for (prefix, ns) in &self.prefixes {
            ctx.terms.insert(
                prefix.clone(),
                ContextEntry {
                    id: Some(ns.clone()),
                    type_: None,
                },
            );
        }
        for prefix in &self.masked {
            ctx.terms.insert(prefix.clone(), ContextEntry::default());
        }
        ctx
    }

    /// A compactor over this mapping.
    pub fn compactor(&self) -> ContextCompactor {
        ContextCompactor::new(&self.to_parsed())
    }
}

/// Parsed context with only the `id`/`type` aliases defined
pub(crate) fn aliased_context() -> ParsedContext {
    let mut ctx = ParsedContext::new();
    ctx.id_key = jsonld::ID_ALIAS.to_string();
    ctx.type_key = jsonld::TYPE_ALIAS.to_string();
    for (alias, keyword) in [
        (jsonld::ID_ALIAS, jsonld::ID),
        (jsonld::TYPE_ALIAS, jsonld::TYPE),
    ] {
        ctx.terms.insert(
            alias.to_string(),
            ContextEntry {
                id: Some(keyword.to_string()),
                type_: None,
            },
        );
    }
    ctx
}

/// Build the minimal context for a set of objects.
///
/// Registry prefixes are assigned first, then synthesized ones, each pass in
/// namespace order, so the result depends only on the input set.
pub fn build_context<'a>(
    objects: impl IntoIterator<Item = &'a GraphObject>,
    registry: &dyn PrefixRegistry,
) -> Result<NamespaceContext> {
    let objects: Vec<&GraphObject> = objects.into_iter().collect();
    let namespaces = collect_namespaces(objects.iter().copied())?;
    let schemes = reference_schemes(&objects);

    let mut prefixes: BTreeMap<String, String> = BTreeMap::new();
    let mut pending: Vec<(&str, String)> = Vec::new();

    for &ns in &namespaces {
        match registry.prefix_for(ns)? {
            Some(prefix)
                if is_assignable(&prefix)
                    && !schemes.contains(&prefix)
                    && !prefixes.contains_key(&prefix) =>
            {
                prefixes.insert(prefix, ns.to_string());
            }
            Some(prefix) => {
                debug!(namespace = %ns, prefix = %prefix, "registered prefix unusable, synthesizing");
                pending.push((ns, synthesize_prefix(ns)));
            }
            None => {
                let prefix = synthesize_prefix(ns);
                warn!(
                    namespace = %ns,
                    prefix = %prefix,
                    "namespace has no registered prefix; register one to stabilize output"
                );
                pending.push((ns, prefix));
            }
        }
    }

    let mut synthesized = Vec::with_capacity(pending.len());
    for (ns, base) in pending {
        let prefix = disambiguate(&base, |p| prefixes.contains_key(p) || schemes.contains(p));
        if prefix != base {
            debug!(namespace = %ns, wanted = %base, assigned = %prefix, "prefix collision");
        }
        prefixes.insert(prefix, ns.to_string());
        synthesized.push(ns.to_string());
    }

    let masked: BTreeSet<String> = registry
        .entries()?
        .into_iter()
        .map(|(prefix, _)| prefix)
        .filter(|prefix| schemes.contains(prefix))
        .collect();
    if !masked.is_empty() {
        debug!(masked = ?masked, "registry prefixes shadowed by reference schemes");
    }

    Ok(NamespaceContext {
        prefixes,
        synthesized,
        masked,
    })
}

/// Schemes of identifiers and URI values that would read as a compact IRI
/// prefix.
fn reference_schemes(objects: &[&GraphObject]) -> BTreeSet<String> {
    let mut schemes = BTreeSet::new();
    for object in objects {
        let uris = object
            .properties()
            .flat_map(|(_, values)| values.iter().filter_map(PropertyValue::as_uri));
        for uri in std::iter::once(object.id.as_str()).chain(uris) {
            if let Some((scheme, _)) = iri::parse_prefix(uri) {
                schemes.insert(scheme);
            }
        }
    }
    schemes
}

/// Every namespace referenced by the objects' types, property keys and URI values.
pub fn collect_namespaces<'a>(
    objects: impl IntoIterator<Item = &'a GraphObject>,
) -> Result<BTreeSet<&'a str>> {
    let mut namespaces = BTreeSet::new();
    for object in objects {
        namespaces.insert(namespace_of(&object.type_iri)?);
        for (property, values) in object.properties() {
            namespaces.insert(namespace_of(property)?);
            for uri in values.iter().filter_map(PropertyValue::as_uri) {
                namespaces.insert(namespace_of(uri)?);
            }
        }
    }
    Ok(namespaces)
}

fn namespace_of(uri: &str) -> Result<&str> {
    let malformed = || CodecError::MalformedIri {
        iri: uri.to_string(),
    };
    if !iri::is_well_formed(uri) {
        return Err(malformed());
    }
    iri::split_namespace(uri)
        .map(|(ns, _)| ns)
        .ok_or_else(malformed)
}

/// Best-effort prefix from the last segment of a namespace.
///
/// `http://example.org/people#` → `people`, `urn:kg:rel:` → `rel`.
fn synthesize_prefix(namespace: &str) -> String {
    let trimmed = namespace.trim_end_matches(['/', '#', ':']);
    let tail = trimmed
        .rsplit(['/', '#', ':'])
        .next()
        .unwrap_or_default();
    let candidate: String = tail
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase();

    if is_assignable(&candidate) {
        candidate
    } else {
        FALLBACK_PREFIX.to_string()
    }
}

/// NCName-ish, not reserved.
fn is_assignable(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !RESERVED_PREFIXES.contains(&prefix)
}

fn disambiguate(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !taken(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}
