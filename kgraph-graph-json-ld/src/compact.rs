use crate::context::ParsedContext;
use std::collections::{BTreeMap, HashMap};

/// A precomputed lookup table for IRI compaction.
///
/// Namespace entries are sorted longest-first so the most specific prefix
/// always wins (e.g. `http://schema.org/Person/` before `http://schema.org/`).
/// Namespaces may end in `/`, `#` or `:` (URN-style).
///
/// Build once from a `ParsedContext`, then call `compact_vocab()` for each
/// property or type IRI. Node identifiers are never compacted.
#[derive(Debug, Clone)]
pub struct ContextCompactor {
    /// Full IRI → term (exact matches)
    exact: HashMap<String, String>,
    /// Namespace IRIs paired with their prefix, longest first
    prefixes: Vec<(String, String)>,
}

impl ContextCompactor {
    pub fn new(context: &ParsedContext) -> Self {
        let exact = reverse_context(context);
        let prefixes = sorted_prefix_iris(&exact);
        Self { exact, prefixes }
    }

    /// Compact an IRI using @vocab rules: exact term, then longest prefix,
    /// then the IRI unchanged.
    pub fn compact_vocab(&self, iri: &str) -> String {
        if let Some(term) = self.exact.get(iri) {
            return term.clone();
        }

        for (prefix_iri, prefix_name) in &self.prefixes {
            let Some(suffix) = iri.strip_prefix(prefix_iri.as_str()) else {
                continue;
            };
            if suffix.is_empty() {
                continue;
            }
            if prefix_name == ":vocab" || prefix_name == ":base" {
                return suffix.to_string();
            }
            return format!("{}:{}", prefix_name, suffix);
        }

        iri.to_string()
    }
}

/// Build the reverse context: full IRI → term name.
///
/// When several terms map to the same IRI the lexically smallest term wins,
/// so the table does not depend on HashMap iteration order.
fn reverse_context(context: &ParsedContext) -> HashMap<String, String> {
    let ordered: BTreeMap<&String, &String> = context
        .terms
        .iter()
        .filter_map(|(term, entry)| entry.id.as_ref().map(|id| (term, id)))
        .filter(|(_, id)| !id.starts_with('@'))
        .collect();

    let mut flipped = HashMap::new();
    for (term, id) in ordered {
        flipped.entry(id.clone()).or_insert_with(|| term.clone());
    }

    if let Some(ref vocab) = context.vocab {
        flipped.insert(vocab.clone(), ":vocab".to_string());
    }
    if let Some(ref base) = context.base {
        flipped.insert(base.clone(), ":base".to_string());
    }

    flipped
}

/// Extract namespace IRIs (ending in `/`, `#` or `:`) and sort longest-first.
fn sorted_prefix_iris(flipped: &HashMap<String, String>) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = flipped
        .iter()
        .filter(|(iri, _)| iri.ends_with('/') || iri.ends_with('#') || iri.ends_with(':'))
        .map(|(iri, prefix)| (iri.clone(), prefix.clone()))
        .collect();
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
    pairs
}
