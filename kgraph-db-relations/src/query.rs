//! Graph patterns for relation queries
//!
//! Every relation query starts from the edge shape:
//!
//! ```sparql
//! ?edge kg:source ?source .
//! ?edge kg:destination ?destination .
//! ?edge kg:relationType ?relationType .
//! ?edge rdf:type ?edgeType .
//! FILTER(?edgeType IN (<edge classes>))
//! ```
//!
//! and adds one restriction per criterion. With an anchor, `direction=all`
//! becomes an explicit `UNION` of the outgoing and incoming restrictions.

use crate::filter::{Criteria, Direction, Pagination};
use kgraph_db_store::{Expression, GraphPattern, PatternTerm, SelectQuery};
use kgraph_vocab::{kg, rdf};

/// Variable bound to each matching edge
pub const EDGE_VAR: &str = "edge";

const SEARCH_PROP_VAR: &str = "searchProp";
const SEARCH_TEXT_VAR: &str = "searchText";

fn edge() -> PatternTerm {
    PatternTerm::var(EDGE_VAR)
}

/// Build the pattern matching every edge that satisfies `criteria`.
///
/// `edge_types` are the classes an edge's `rdf:type` must be one of;
/// `search_properties` are the literal properties `searchText` is matched
/// against.
pub fn relation_pattern(
    criteria: &Criteria,
    edge_types: &[&str],
    search_properties: &[String],
) -> GraphPattern {
    let mut pattern = GraphPattern::new()
        .triple(edge(), PatternTerm::iri(kg::SOURCE), PatternTerm::var("source"))
        .triple(
            edge(),
            PatternTerm::iri(kg::DESTINATION),
            PatternTerm::var("destination"),
        )
        .triple(
            edge(),
            PatternTerm::iri(kg::RELATION_TYPE),
            PatternTerm::var("relationType"),
        )
        .triple(edge(), PatternTerm::iri(rdf::TYPE), PatternTerm::var("edgeType"))
        .filter(Expression::in_list(
            Expression::var("edgeType"),
            edge_types.iter().map(|t| Expression::iri(t)).collect(),
        ));

    if let Some(ref relation_type) = criteria.relation_type {
        pattern = pattern.triple(
            edge(),
            PatternTerm::iri(kg::RELATION_TYPE),
            PatternTerm::iri(relation_type),
        );
    }

    let other = criteria.destination.as_deref();
    pattern = match criteria.source.as_deref() {
        Some(anchor) => match criteria.direction {
            Direction::Outgoing => append(pattern, outgoing(anchor, other)),
            Direction::Incoming => append(pattern, incoming(anchor, other)),
            Direction::All => pattern.union(vec![outgoing(anchor, other), incoming(anchor, other)]),
        },
        // No anchor: direction has nothing to orient
        None => match other {
            Some(destination) => pattern.triple(
                edge(),
                PatternTerm::iri(kg::DESTINATION),
                PatternTerm::iri(destination),
            ),
            None => pattern,
        },
    };

    if let Some(ref text) = criteria.search_text {
        pattern = pattern
            .triple(
                edge(),
                PatternTerm::var(SEARCH_PROP_VAR),
                PatternTerm::var(SEARCH_TEXT_VAR),
            )
            .filter(Expression::in_list(
                Expression::var(SEARCH_PROP_VAR),
                search_properties.iter().map(|p| Expression::iri(p)).collect(),
            ))
            .filter(Expression::contains_ignore_case(
                Expression::var(SEARCH_TEXT_VAR),
                text,
            ));
    }

    pattern
}

/// Anchor is the edge's source; `other` (if any) its destination.
fn outgoing(anchor: &str, other: Option<&str>) -> GraphPattern {
    anchored(kg::SOURCE, anchor, kg::DESTINATION, other)
}

/// Anchor is the edge's destination; `other` (if any) its source.
fn incoming(anchor: &str, other: Option<&str>) -> GraphPattern {
    anchored(kg::DESTINATION, anchor, kg::SOURCE, other)
}

fn anchored(end: &str, anchor: &str, other_end: &str, other: Option<&str>) -> GraphPattern {
    let branch = GraphPattern::new().triple(edge(), PatternTerm::iri(end), PatternTerm::iri(anchor));
    match other {
        Some(other) => branch.triple(edge(), PatternTerm::iri(other_end), PatternTerm::iri(other)),
        None => branch,
    }
}

fn append(mut pattern: GraphPattern, branch: GraphPattern) -> GraphPattern {
    pattern.patterns.extend(branch.patterns);
    pattern
}

/// One page of distinct edge identifiers, ordered by identifier.
pub fn page_query(pattern: GraphPattern, page: Pagination) -> SelectQuery {
    SelectQuery::new(&[EDGE_VAR], pattern)
        .distinct()
        .order_by(EDGE_VAR)
        .limit(page.size)
        .offset(page.offset)
}

/// `SELECT ?p ?o WHERE { <id> ?p ?o }`
pub fn describe_query(id: &str) -> SelectQuery {
    let pattern = GraphPattern::new().triple(
        PatternTerm::iri(id),
        PatternTerm::var("p"),
        PatternTerm::var("o"),
    );
    SelectQuery::new(&["p", "o"], pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgraph_db_store::Pattern;
    use pretty_assertions::assert_eq;

    const E1: &str = "http://example.org/e1";
    const E2: &str = "http://example.org/e2";

    fn criteria() -> Criteria {
        Criteria {
            source: None,
            destination: None,
            relation_type: None,
            direction: Direction::All,
            search_text: None,
        }
    }

    fn unions(pattern: &GraphPattern) -> usize {
        pattern
            .patterns
            .iter()
            .filter(|p| matches!(p, Pattern::Union(_)))
            .count()
    }

    #[test]
    fn test_unanchored_has_no_union() {
        let pattern = relation_pattern(&criteria(), &[kg::EDGE], &[]);
        assert_eq!(unions(&pattern), 0);
        assert_eq!(pattern.patterns.len(), 5);
    }

    #[test]
    fn test_all_with_anchor_is_union() {
        let c = Criteria {
            source: Some(E1.to_string()),
            destination: Some(E2.to_string()),
            ..criteria()
        };
        let pattern = relation_pattern(&c, &[kg::EDGE], &[]);
        assert_eq!(unions(&pattern), 1);

        let Some(Pattern::Union(branches)) = pattern.patterns.last() else {
            panic!("expected trailing union");
        };
        assert_eq!(branches, &vec![outgoing(E1, Some(E2)), incoming(E1, Some(E2))]);
    }

    #[test]
    fn test_outgoing_restricts_source() {
        let c = Criteria {
            source: Some(E1.to_string()),
            direction: Direction::Outgoing,
            ..criteria()
        };
        let sparql = relation_pattern(&c, &[kg::EDGE], &[]).to_string();
        assert!(sparql.contains(&format!("?edge <{}> <{}>", kg::SOURCE, E1)));
        assert!(!sparql.contains("UNION"));
    }

    #[test]
    fn test_destination_without_anchor() {
        let c = Criteria {
            destination: Some(E1.to_string()),
            direction: Direction::Outgoing,
            ..criteria()
        };
        let sparql = relation_pattern(&c, &[kg::EDGE], &[]).to_string();
        assert!(sparql.contains(&format!("?edge <{}> <{}>", kg::DESTINATION, E1)));
    }

    #[test]
    fn test_search_adds_filters() {
        let c = Criteria {
            search_text: Some("Acme".to_string()),
            ..criteria()
        };
        let pattern = relation_pattern(&c, &[kg::EDGE], &[kg::NAME.to_string()]);
        let sparql = pattern.to_string();
        assert!(sparql.contains("?edge ?searchProp ?searchText"));
        assert!(sparql.contains("\"acme\""));
    }

    #[test]
    fn test_page_query_rendering() {
        let query = page_query(
            GraphPattern::new(),
            Pagination {
                size: 10,
                offset: 20,
            },
        );
        let sparql = query.to_string();
        assert!(sparql.starts_with("SELECT DISTINCT ?edge WHERE"));
        assert!(sparql.contains("ORDER BY ?edge"));
        assert!(sparql.contains("LIMIT 10"));
        assert!(sparql.contains("OFFSET 20"));
    }
}
