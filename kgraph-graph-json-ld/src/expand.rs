use crate::context::{ContextEntry, ParsedContext};
use crate::error::{JsonLdError, Result};
use crate::iri;

/// URI schemes that are taken as absolute even when a context defines no
/// prefix of the same name.
const ABSOLUTE_SCHEMES: [&str; 9] = [
    "http", "https", "urn", "did", "mailto", "ftp", "file", "tag", "ipfs",
];

/// Attempts exact match with a term in context.
fn match_exact(compact_iri: &str, context: &ParsedContext) -> Option<(String, ContextEntry)> {
    context.get(compact_iri).and_then(|entry| {
        entry.id.clone().map(|iri| (iri, entry.clone()))
    })
}

/// Attempts prefix match with a compact IRI.
fn match_prefix(compact_iri: &str, context: &ParsedContext) -> Option<String> {
    iri::parse_prefix(compact_iri).and_then(|(prefix, suffix)| {
        context
            .get(&prefix)
            .and_then(|entry| entry.id.as_ref())
            .map(|prefix_iri| format!("{}{}", prefix_iri, suffix))
    })
}

/// Uses default vocab/base if the term doesn't look like an IRI.
fn match_default(compact_iri: &str, context: &ParsedContext, vocab: bool) -> Option<String> {
    let default = if vocab {
        context.vocab.as_ref()
    } else {
        context.base.as_ref()
    };

    default.and_then(|default| {
        if !iri::any_iri(compact_iri) && !compact_iri.starts_with('@') {
            Some(format!("{}{}", default, compact_iri))
        } else {
            None
        }
    })
}

/// Expand details: returns (expanded_iri, context_entry).
///
/// If vocab is true, uses @vocab for properties/classes; otherwise @base.
/// Unknown terms come back unchanged with no entry.
pub fn details(
    compact_iri: &str,
    context: &ParsedContext,
    vocab: bool,
) -> (String, Option<ContextEntry>) {
    if let Some((iri, entry)) = match_exact(compact_iri, context) {
        return (iri, Some(entry));
    }

    if let Some(iri) = match_prefix(compact_iri, context) {
        // A term defined for the full IRI carries its own coercion
        let entry = context.get(&iri).cloned();
        return (iri, entry);
    }

    if let Some(iri) = match_default(compact_iri, context, vocab) {
        let entry = context.get(&iri).cloned();
        return (iri, entry);
    }

    (compact_iri.to_string(), None)
}

/// Expand a single IRI, returning it unchanged when nothing matches
pub fn iri(compact_iri: &str, context: &ParsedContext, vocab: bool) -> String {
    details(compact_iri, context, vocab).0
}

/// Expand a single IRI strictly.
///
/// Fails with [`JsonLdError::Unresolvable`] when `compact_iri` uses a prefix
/// the context does not define, or is a bare term with no `@vocab`/`@base`
/// to resolve it against. Absolute IRIs with a well-known scheme pass
/// through unchanged.
pub fn try_iri(compact_iri: &str, context: &ParsedContext, vocab: bool) -> Result<String> {
    let (expanded, entry) = details(compact_iri, context, vocab);
    if entry.is_some() || expanded != compact_iri {
        return Ok(expanded);
    }

    let unresolvable = || JsonLdError::Unresolvable {
        term: compact_iri.to_string(),
    };

    match iri::parse_prefix(compact_iri) {
        // Compact form with an unknown prefix, unless the prefix is a scheme
        Some((prefix, _)) => {
            if ABSOLUTE_SCHEMES.contains(&prefix.to_ascii_lowercase().as_str())
                && iri::is_well_formed(compact_iri)
            {
                Ok(compact_iri.to_string())
            } else {
                Err(unresolvable())
            }
        }
        // `scheme://...` style absolute IRI
        None if iri::is_well_formed(compact_iri) => Ok(compact_iri.to_string()),
        None => Err(unresolvable()),
    }
}
