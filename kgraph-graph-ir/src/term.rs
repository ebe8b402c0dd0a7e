//! RDF term types: IRI and literal
//!
//! Edges and nodes in the store are always named by IRIs, so there is no
//! blank-node variant.

use crate::Datatype;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Literal value storage
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LiteralValue {
    /// String value, also the lexical form of date-time and geo literals
    String(Arc<str>),
    Boolean(bool),
    Integer(i64),
    Double(f64),
}

impl LiteralValue {
    /// Create a string literal value
    pub fn string(s: impl AsRef<str>) -> Self {
        LiteralValue::String(Arc::from(s.as_ref()))
    }

    /// Get the lexical representation of this value
    pub fn lexical(&self) -> String {
        match self {
            LiteralValue::String(s) => s.to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Integer(i) => i.to_string(),
            LiteralValue::Double(d) => {
                if d.is_nan() {
                    "NaN".to_string()
                } else if d.is_infinite() {
                    if d.is_sign_positive() {
                        "INF".to_string()
                    } else {
                        "-INF".to_string()
                    }
                } else {
                    d.to_string()
                }
            }
        }
    }

    /// Try to get as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a == b,
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a == b,
            (LiteralValue::Integer(a), LiteralValue::Integer(b)) => a == b,
            (LiteralValue::Double(a), LiteralValue::Double(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::String(s) => s.hash(state),
            LiteralValue::Boolean(b) => b.hash(state),
            LiteralValue::Integer(i) => i.hash(state),
            LiteralValue::Double(d) => d.to_bits().hash(state),
        }
    }
}

impl PartialOrd for LiteralValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LiteralValue {
    fn cmp(&self, other: &Self) -> Ordering {
        // String < Boolean < Integer < Double
        let type_ord = |v: &LiteralValue| -> u8 {
            match v {
                LiteralValue::String(_) => 0,
                LiteralValue::Boolean(_) => 1,
                LiteralValue::Integer(_) => 2,
                LiteralValue::Double(_) => 3,
            }
        };

        match type_ord(self).cmp(&type_ord(other)) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a.cmp(b),
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a.cmp(b),
            (LiteralValue::Integer(a), LiteralValue::Integer(b)) => a.cmp(b),
            (LiteralValue::Double(a), LiteralValue::Double(b)) => {
                a.partial_cmp(b).unwrap_or_else(|| a.to_bits().cmp(&b.to_bits()))
            }
            _ => Ordering::Equal,
        }
    }
}

/// An RDF term (subject, predicate, or object position)
///
/// # Invariants
///
/// - `Term::Iri` always contains an **expanded** IRI, never a prefixed form.
/// - The subject and predicate positions of a triple are always `Term::Iri`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Term {
    /// Full expanded IRI (e.g., "https://ns.kgraph.dev/core#Edge")
    Iri(Arc<str>),

    /// Literal value with explicit datatype
    Literal {
        value: LiteralValue,
        datatype: Datatype,
    },
}

impl Term {
    /// Create an IRI term from an expanded IRI string
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    /// Create a plain string literal (xsd:string)
    pub fn string(value: impl AsRef<str>) -> Self {
        Term::Literal {
            value: LiteralValue::string(value),
            datatype: Datatype::xsd_string(),
        }
    }

    /// Create a boolean literal (xsd:boolean)
    pub fn boolean(value: bool) -> Self {
        Term::Literal {
            value: LiteralValue::Boolean(value),
            datatype: Datatype::xsd_boolean(),
        }
    }

    /// Create an integer literal (xsd:integer)
    pub fn integer(value: i64) -> Self {
        Term::Literal {
            value: LiteralValue::Integer(value),
            datatype: Datatype::xsd_integer(),
        }
    }

    /// Create a double literal (xsd:double)
    pub fn double(value: f64) -> Self {
        Term::Literal {
            value: LiteralValue::Double(value),
            datatype: Datatype::xsd_double(),
        }
    }

    /// Create a typed literal from its lexical form
    pub fn typed(value: impl AsRef<str>, datatype: Datatype) -> Self {
        Term::Literal {
            value: LiteralValue::string(value),
            datatype,
        }
    }

    /// Check if this is an IRI term
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    /// Try to get as IRI string
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Try to get literal components
    pub fn as_literal(&self) -> Option<(&LiteralValue, &Datatype)> {
        match self {
            Term::Literal { value, datatype } => Some((value, datatype)),
            _ => None,
        }
    }

    /// Lexical text of this term: the IRI itself, or the literal's lexical form
    pub fn lexical(&self) -> String {
        match self {
            Term::Iri(iri) => iri.to_string(),
            Term::Literal { value, .. } => value.lexical(),
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Iri(a), Term::Iri(b)) => a == b,
            (
                Term::Literal {
                    value: v1,
                    datatype: d1,
                },
                Term::Literal {
                    value: v2,
                    datatype: d2,
                },
            ) => v1 == v2 && d1 == d2,
            _ => false,
        }
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Term::Iri(iri) => iri.hash(state),
            Term::Literal { value, datatype } => {
                value.hash(state);
                datatype.hash(state);
            }
        }
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        // Iri < Literal
        match (self, other) {
            (Term::Iri(a), Term::Iri(b)) => a.cmp(b),
            (Term::Iri(_), Term::Literal { .. }) => Ordering::Less,
            (Term::Literal { .. }, Term::Iri(_)) => Ordering::Greater,
            (
                Term::Literal {
                    value: v1,
                    datatype: d1,
                },
                Term::Literal {
                    value: v2,
                    datatype: d2,
                },
            ) => (d1, v1).cmp(&(d2, v2)),
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Literal { value, datatype } => match value {
                LiteralValue::String(_) => {
                    write!(f, "\"{}\"", escape_literal(&value.lexical()))?;
                    if datatype.is_xsd_string() {
                        Ok(())
                    } else {
                        write!(f, "^^<{}>", datatype.as_iri())
                    }
                }
                _ => write!(f, "\"{}\"^^<{}>", value.lexical(), datatype.as_iri()),
            },
        }
    }
}

/// Escape a lexical form for N-Triples / SPARQL string syntax
pub(crate) fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_constructors() {
        let iri = Term::iri("http://example.org/foo");
        assert!(iri.is_iri());
        assert_eq!(iri.as_iri(), Some("http://example.org/foo"));

        let string = Term::string("hello");
        assert!(string.is_literal());
        let (value, dt) = string.as_literal().unwrap();
        assert_eq!(value.as_str(), Some("hello"));
        assert!(dt.is_xsd_string());
    }

    #[test]
    fn test_literal_lexical() {
        assert_eq!(LiteralValue::Boolean(true).lexical(), "true");
        assert_eq!(LiteralValue::Integer(42).lexical(), "42");
        assert_eq!(LiteralValue::Double(f64::NAN).lexical(), "NaN");
        assert_eq!(LiteralValue::Double(f64::NEG_INFINITY).lexical(), "-INF");
    }

    #[test]
    fn test_term_ordering() {
        let iri = Term::iri("http://example.org");
        let lit = Term::string("hello");
        assert!(iri < lit);

        let iri_a = Term::iri("http://a.org");
        let iri_b = Term::iri("http://b.org");
        assert!(iri_a < iri_b);
    }

    #[test]
    fn test_term_display() {
        assert_eq!(
            format!("{}", Term::iri("http://example.org")),
            "<http://example.org>"
        );
        assert_eq!(format!("{}", Term::string("say \"hi\"")), "\"say \\\"hi\\\"\"");
        assert_eq!(
            format!("{}", Term::integer(42)),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        assert_eq!(
            format!("{}", Term::typed("POINT(1 2)", Datatype::geo_wkt_literal())),
            "\"POINT(1 2)\"^^<http://www.opengis.net/ont/geosparql#wktLiteral>"
        );
    }

    #[test]
    fn test_double_equality_with_nan() {
        assert_eq!(Term::double(f64::NAN), Term::double(f64::NAN));
        assert_ne!(Term::double(1.0), Term::integer(1));
    }
}
