//! RDF vocabulary constants for the kgraph knowledge-graph store
//!
//! This crate is the single place where vocabulary IRIs live. Everything
//! else in the workspace works with expanded IRIs and refers back here.
//!
//! # Organization
//!
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `rdfs` - RDFS vocabulary (http://www.w3.org/2000/01/rdf-schema#)
//! - `xsd` - XSD datatypes (http://www.w3.org/2001/XMLSchema#)
//! - `geo` - GeoSPARQL literal types (http://www.opengis.net/ont/geosparql#)
//! - `kg` - the knowledge-graph core vocabulary (entities, frames, slots, edges)
//! - `jsonld` - JSON-LD keywords and the fixed context aliases
//! - `prefixes` - well-known namespace ⇄ prefix pairs

/// RDF vocabulary constants
pub mod rdf {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:comment IRI
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
}

/// XSD vocabulary constants
pub mod xsd {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

    /// Check if a datatype IRI is an integer-family type
    #[inline]
    pub fn is_integer_family(datatype_iri: &str) -> bool {
        matches!(datatype_iri, INTEGER | LONG | INT | SHORT)
    }

    /// Check if a datatype IRI is stored as an f64
    #[inline]
    pub fn is_float_family(datatype_iri: &str) -> bool {
        matches!(datatype_iri, DOUBLE | FLOAT | DECIMAL)
    }
}

/// GeoSPARQL literal types
pub mod geo {
    /// Namespace IRI
    pub const NS: &str = "http://www.opengis.net/ont/geosparql#";

    /// geo:wktLiteral IRI, used for point locations
    pub const WKT_LITERAL: &str = "http://www.opengis.net/ont/geosparql#wktLiteral";
}

/// The knowledge-graph core vocabulary
pub mod kg {
    /// Namespace IRI
    pub const NS: &str = "https://ns.kgraph.dev/core#";

    // Classes
    pub const ENTITY: &str = "https://ns.kgraph.dev/core#Entity";
    pub const FRAME: &str = "https://ns.kgraph.dev/core#Frame";
    pub const SLOT: &str = "https://ns.kgraph.dev/core#Slot";
    pub const EDGE: &str = "https://ns.kgraph.dev/core#Edge";

    // Edge structure
    pub const SOURCE: &str = "https://ns.kgraph.dev/core#source";
    pub const DESTINATION: &str = "https://ns.kgraph.dev/core#destination";
    pub const RELATION_TYPE: &str = "https://ns.kgraph.dev/core#relationType";

    // Descriptive properties
    pub const NAME: &str = "https://ns.kgraph.dev/core#name";
    pub const DESCRIPTION: &str = "https://ns.kgraph.dev/core#description";

    /// The three structural properties every edge must carry.
    pub const EDGE_STRUCTURE: [&str; 3] = [SOURCE, DESTINATION, RELATION_TYPE];
}

/// JSON-LD keywords and the fixed context aliases
pub mod jsonld {
    pub const CONTEXT: &str = "@context";
    pub const GRAPH: &str = "@graph";
    pub const ID: &str = "@id";
    pub const TYPE: &str = "@type";
    pub const VALUE: &str = "@value";

    /// Alias key mapped to `@id` in every generated context
    pub const ID_ALIAS: &str = "id";

    /// Alias key mapped to `@type` in every generated context
    pub const TYPE_ALIAS: &str = "type";
}

/// Well-known namespace ⇄ prefix pairs
///
/// Used to seed the default prefix registry. Ordered by prefix.
pub mod prefixes {
    pub const WELL_KNOWN: [(&str, &str); 7] = [
        ("geo", super::geo::NS),
        ("kg", super::kg::NS),
        ("rdf", super::rdf::NS),
        ("rdfs", super::rdfs::NS),
        ("schema", "http://schema.org/"),
        ("skos", "http://www.w3.org/2004/02/skos/core#"),
        ("xsd", super::xsd::NS),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kg_terms_share_namespace() {
        for iri in [kg::ENTITY, kg::EDGE, kg::SOURCE, kg::DESTINATION, kg::RELATION_TYPE] {
            assert!(iri.starts_with(kg::NS), "{iri} outside kg namespace");
        }
    }

    #[test]
    fn test_integer_family() {
        assert!(xsd::is_integer_family(xsd::LONG));
        assert!(xsd::is_integer_family(xsd::INTEGER));
        assert!(!xsd::is_integer_family(xsd::DOUBLE));
        assert!(xsd::is_float_family(xsd::FLOAT));
    }

    #[test]
    fn test_well_known_prefixes_unique() {
        let mut seen = std::collections::HashSet::new();
        for (prefix, ns) in prefixes::WELL_KNOWN {
            assert!(seen.insert(prefix), "duplicate prefix {prefix}");
            assert!(ns.ends_with('/') || ns.ends_with('#'));
        }
    }
}
