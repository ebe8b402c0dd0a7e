//! RDF literal datatypes
//!
//! Datatypes are always explicit in this IR - there is no "untyped" literal.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Datatype IRIs used by the constructors below
pub mod iri {
    pub use kgraph_vocab::geo::WKT_LITERAL as GEO_WKT_LITERAL;
    pub use kgraph_vocab::xsd::{
        ANY_URI as XSD_ANY_URI, BOOLEAN as XSD_BOOLEAN, DATE_TIME as XSD_DATE_TIME,
        DOUBLE as XSD_DOUBLE, INTEGER as XSD_INTEGER, STRING as XSD_STRING,
    };
}

/// RDF literal datatype, always an expanded IRI
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Datatype(Arc<str>);

impl Datatype {
    /// Create a datatype from an expanded IRI
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Datatype(Arc::from(iri.as_ref()))
    }

    /// xsd:string - default for plain string literals
    pub fn xsd_string() -> Self {
        Self::from_iri(iri::XSD_STRING)
    }

    /// xsd:boolean
    pub fn xsd_boolean() -> Self {
        Self::from_iri(iri::XSD_BOOLEAN)
    }

    /// xsd:integer
    pub fn xsd_integer() -> Self {
        Self::from_iri(iri::XSD_INTEGER)
    }

    /// xsd:double
    pub fn xsd_double() -> Self {
        Self::from_iri(iri::XSD_DOUBLE)
    }

    /// xsd:dateTime
    pub fn xsd_date_time() -> Self {
        Self::from_iri(iri::XSD_DATE_TIME)
    }

    /// geo:wktLiteral
    pub fn geo_wkt_literal() -> Self {
        Self::from_iri(iri::GEO_WKT_LITERAL)
    }

    /// Get the IRI representation of this datatype
    pub fn as_iri(&self) -> &str {
        &self.0
    }

    /// Check if this is the xsd:string datatype
    pub fn is_xsd_string(&self) -> bool {
        self.as_iri() == iri::XSD_STRING
    }
}

impl PartialEq for Datatype {
    fn eq(&self, other: &Self) -> bool {
        self.as_iri() == other.as_iri()
    }
}

impl Eq for Datatype {}

impl Hash for Datatype {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_iri().hash(state);
    }
}

impl PartialOrd for Datatype {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Datatype {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_iri().cmp(other.as_iri())
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_iri())
    }
}
