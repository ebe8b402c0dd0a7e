//! Property values and their RDF term mapping

use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use kgraph_graph_ir::{Datatype, LiteralValue, Term};
use kgraph_vocab::{geo, xsd};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 point
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// WKT form: `POINT(lon lat)`
    pub fn to_wkt(&self) -> String {
        format!("POINT({} {})", self.longitude, self.latitude)
    }

    /// Parse a WKT `POINT(lon lat)` literal.
    pub fn parse_wkt(wkt: &str) -> Option<Self> {
        let trimmed = wkt.trim();
        let head = trimmed.get(..5)?;
        if !head.eq_ignore_ascii_case("POINT") {
            return None;
        }
        let body = trimmed[5..].trim_start().strip_prefix('(')?.strip_suffix(')')?;
        let mut parts = body.split_whitespace();
        let longitude = parts.next()?.parse().ok()?;
        let latitude = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(latitude, longitude))
    }
}

impl PartialEq for GeoPoint {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

/// The kind of a property value, also used as a declared property range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Integer,
    Boolean,
    Double,
    DateTime,
    Uri,
    Geo,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
            ValueKind::Double => "double",
            ValueKind::DateTime => "datetime",
            ValueKind::Uri => "uri",
            ValueKind::Geo => "geo",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single value of a graph object property
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Double(f64),
    DateTime(DateTime<Utc>),
    /// Reference to another node, always a full URI
    Uri(String),
    Geo(GeoPoint),
}

impl PropertyValue {
    pub fn string(s: impl Into<String>) -> Self {
        PropertyValue::String(s.into())
    }

    pub fn uri(s: impl Into<String>) -> Self {
        PropertyValue::Uri(s.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::String(_) => ValueKind::String,
            PropertyValue::Integer(_) => ValueKind::Integer,
            PropertyValue::Boolean(_) => ValueKind::Boolean,
            PropertyValue::Double(_) => ValueKind::Double,
            PropertyValue::DateTime(_) => ValueKind::DateTime,
            PropertyValue::Uri(_) => ValueKind::Uri,
            PropertyValue::Geo(_) => ValueKind::Geo,
        }
    }

    pub fn as_uri(&self) -> Option<&str> {
        match self {
            PropertyValue::Uri(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Parse a lexical string as a value of the given kind.
    ///
    /// `property` is only used for error reporting.
    pub fn parse_as(kind: ValueKind, lexical: &str, property: &str) -> Result<Self> {
        let invalid = |what: &str| Error::invalid_value(property, format!("{lexical:?} is not a valid {what}"));
        match kind {
            ValueKind::String => Ok(PropertyValue::String(lexical.to_string())),
            ValueKind::Uri => Ok(PropertyValue::Uri(lexical.to_string())),
            ValueKind::Integer => lexical
                .trim()
                .parse()
                .map(PropertyValue::Integer)
                .map_err(|_| invalid("integer")),
            ValueKind::Double => parse_double(lexical)
                .map(PropertyValue::Double)
                .ok_or_else(|| invalid("double")),
            ValueKind::Boolean => match lexical.trim() {
                "true" | "1" => Ok(PropertyValue::Boolean(true)),
                "false" | "0" => Ok(PropertyValue::Boolean(false)),
                _ => Err(invalid("boolean")),
            },
            ValueKind::DateTime => DateTime::parse_from_rfc3339(lexical.trim())
                .map(|dt| PropertyValue::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| invalid("RFC 3339 date-time")),
            ValueKind::Geo => GeoPoint::parse_wkt(lexical)
                .map(PropertyValue::Geo)
                .ok_or_else(|| invalid("WKT point")),
        }
    }

    /// Parse a typed literal given its datatype IRI.
    pub fn from_typed_lexical(lexical: &str, datatype: &str, property: &str) -> Result<Self> {
        let kind = match datatype {
            xsd::DATE_TIME => ValueKind::DateTime,
            xsd::BOOLEAN => ValueKind::Boolean,
            xsd::ANY_URI => ValueKind::Uri,
            geo::WKT_LITERAL => ValueKind::Geo,
            dt if xsd::is_integer_family(dt) => ValueKind::Integer,
            dt if xsd::is_float_family(dt) => ValueKind::Double,
            _ => ValueKind::String,
        };
        Self::parse_as(kind, lexical, property)
    }

    /// RFC 3339 lexical form used on the wire and in the store
    pub fn date_time_lexical(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Convert to an RDF object term.
    pub fn to_term(&self) -> Term {
        match self {
            PropertyValue::String(s) => Term::string(s),
            PropertyValue::Integer(i) => Term::integer(*i),
            PropertyValue::Boolean(b) => Term::boolean(*b),
            PropertyValue::Double(d) => Term::double(*d),
            PropertyValue::DateTime(dt) => {
                Term::typed(Self::date_time_lexical(dt), Datatype::xsd_date_time())
            }
            PropertyValue::Uri(u) => Term::iri(u),
            PropertyValue::Geo(p) => Term::typed(p.to_wkt(), Datatype::geo_wkt_literal()),
        }
    }

    /// Convert an RDF object term back to a value.
    pub fn from_term(term: &Term, property: &str) -> Result<Self> {
        match term {
            Term::Iri(iri) => Ok(PropertyValue::Uri(iri.to_string())),
            Term::Literal { value, datatype } => match value {
                LiteralValue::Boolean(b) => Ok(PropertyValue::Boolean(*b)),
                LiteralValue::Integer(i) => Ok(PropertyValue::Integer(*i)),
                LiteralValue::Double(d) => Ok(PropertyValue::Double(*d)),
                LiteralValue::String(s) => Self::from_typed_lexical(s, datatype.as_iri(), property),
            },
        }
    }
}

fn parse_double(lexical: &str) -> Option<f64> {
    match lexical.trim() {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        other => other.parse().ok(),
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyValue::String(a), PropertyValue::String(b)) => a == b,
            (PropertyValue::Integer(a), PropertyValue::Integer(b)) => a == b,
            (PropertyValue::Boolean(a), PropertyValue::Boolean(b)) => a == b,
            (PropertyValue::Double(a), PropertyValue::Double(b)) => a.to_bits() == b.to_bits(),
            (PropertyValue::DateTime(a), PropertyValue::DateTime(b)) => a == b,
            (PropertyValue::Uri(a), PropertyValue::Uri(b)) => a == b,
            (PropertyValue::Geo(a), PropertyValue::Geo(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<f64> for PropertyValue {
    fn from(d: f64) -> Self {
        PropertyValue::Double(d)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(dt: DateTime<Utc>) -> Self {
        PropertyValue::DateTime(dt)
    }
}

impl From<GeoPoint> for PropertyValue {
    fn from(p: GeoPoint) -> Self {
        PropertyValue::Geo(p)
    }
}
