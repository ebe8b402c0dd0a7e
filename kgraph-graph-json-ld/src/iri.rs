/// Parse a compact IRI like "schema:name" into (prefix, suffix).
/// Returns None if not a valid compact IRI.
///
/// A compact IRI has the form prefix:suffix where:
/// - prefix is non-empty and does not contain `/`
/// - suffix does not start with `//`
pub fn parse_prefix(s: &str) -> Option<(String, String)> {
    let colon_pos = s.find(':')?;
    let prefix = &s[..colon_pos];
    let suffix = &s[colon_pos + 1..];

    if prefix.is_empty() || prefix.contains('/') || suffix.starts_with("//") {
        return None;
    }

    Some((prefix.to_string(), suffix.to_string()))
}

/// Returns true if string contains a colon (looks like an IRI or compact IRI)
pub fn any_iri(s: &str) -> bool {
    s.contains(':')
}

/// Returns true if the IRI is absolute (has an RFC 3986 scheme).
///
/// An absolute IRI starts with a scheme: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`.
/// Compact IRIs such as `kg:Edge` also satisfy this; `parse_prefix` plus a
/// context lookup is what tells the two apart.
pub fn is_absolute(iri: &str) -> bool {
    if let Some(colon_pos) = iri.find(':') {
        let scheme = &iri[..colon_pos];
        !scheme.is_empty()
            && scheme.as_bytes()[0].is_ascii_alphabetic()
            && scheme
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.')
    } else {
        false
    }
}

/// Returns true if `iri` is absolute and contains no characters that are
/// illegal in an IRI reference (whitespace, `<>"{}|^` and backtick).
pub fn is_well_formed(iri: &str) -> bool {
    is_absolute(iri)
        && !iri.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
        })
}

/// Split an absolute IRI into (namespace, local name).
///
/// The namespace runs up to and including the last `#`, `/` or `:` that
/// leaves a non-empty local name. Hash and slash namespaces take precedence
/// over colon-delimited URN segments. Returns None when no such split
/// exists (e.g. `http://example.org/` has no local part).
pub fn split_namespace(iri: &str) -> Option<(&str, &str)> {
    let scheme_end = iri.find(':')?;
    let body = &iri[scheme_end + 1..];

    let split_at = body
        .rfind(['#', '/'])
        .or_else(|| body.rfind(':'))
        .map(|pos| scheme_end + 1 + pos + 1)
        .unwrap_or(scheme_end + 1);

    if split_at >= iri.len() {
        return None;
    }
    Some((&iri[..split_at], &iri[split_at..]))
}

/// Ensure IRI ends with '/' or '#'
pub fn add_trailing_slash(iri: &str) -> String {
    if iri.ends_with('/') || iri.ends_with('#') {
        iri.to_string()
    } else {
        format!("{}/", iri)
    }
}
