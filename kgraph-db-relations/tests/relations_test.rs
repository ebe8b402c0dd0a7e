mod support;

use kgraph_db_relations::{Direction, RelationError, RelationFilter, RelationsConfig};
use kgraph_graph_format::CodecError;
use kgraph_vocab::kg;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeSet;
use support::{edge_doc, edge_id, engine, insert_entity, seed, E1, E2, E3, KNOWS, WORKS_FOR};

fn ids(filter: &RelationFilter, engine: &kgraph_db_relations::RelationEngine) -> BTreeSet<String> {
    engine
        .list_relation_ids(filter)
        .unwrap()
        .items
        .into_iter()
        .collect()
}

fn set(items: &[&String]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_a_outgoing_from_source_and_nothing_into_it() {
    support::init_log();
    let (engine, store) = engine();
    insert_entity(&store, E1, "Ada");
    insert_entity(&store, E2, "Acme");
    let created = seed(&engine, &[(E1, E2, WORKS_FOR)]);

    let outgoing = engine
        .list_relation_ids(&RelationFilter::new().source(E1).direction(Direction::Outgoing))
        .unwrap();
    assert_eq!(outgoing.items, created);
    assert_eq!(outgoing.total_count, 1);

    let into_e1 = engine
        .list_relation_ids(&RelationFilter::new().destination(E1))
        .unwrap();
    assert!(into_e1.items.is_empty());
    assert_eq!(into_e1.total_count, 0);
}

#[test]
fn scenario_b_upsert_of_new_identifier_matches_create() {
    let (creating, created_store) = engine();
    let (upserting, upserted_store) = engine();
    let doc = edge_doc(&edge_id(1), E1, E2, WORKS_FOR);

    creating.create(&doc).unwrap();
    let outcome = upserting.upsert(&doc).unwrap();

    assert!(outcome.created);
    assert_eq!(outcome.id, edge_id(1));
    assert_eq!(created_store.triples(), upserted_store.triples());
}

#[test]
fn scenario_b_upsert_of_existing_identifier_replaces() {
    let (engine, _) = engine();
    let mut doc = edge_doc(&edge_id(1), E1, E2, WORKS_FOR);
    doc["kg:name"] = json!("Employment");
    doc["kg:description"] = json!("Ada works for Acme");
    engine.create(&doc).unwrap();

    let replacement = json!({
        "@context": {"kg": kg::NS},
        "@id": edge_id(1),
        "kg:name": "Contract",
        "kg:relationType": {"@id": KNOWS}
    });
    let outcome = engine.upsert(&replacement).unwrap();
    assert!(!outcome.created);

    let edge = engine.fetch_edge(&edge_id(1)).unwrap();
    assert_eq!(edge.first(kg::NAME).and_then(|v| v.as_str()), Some("Contract"));
    assert!(!edge.has(kg::DESCRIPTION));
    assert_eq!(edge.first(kg::RELATION_TYPE).and_then(|v| v.as_uri()), Some(KNOWS));
    // Source and destination were not in the payload and are kept
    assert_eq!(edge.first(kg::SOURCE).and_then(|v| v.as_uri()), Some(E1));
    assert_eq!(edge.first(kg::DESTINATION).and_then(|v| v.as_uri()), Some(E2));
}

#[test]
fn scenario_c_delete_reports_only_existing() {
    let (engine, store) = engine();
    let created = seed(&engine, &[(E1, E2, WORKS_FOR)]);

    let report = engine
        .delete(&[created[0].as_str(), "http://example.org/relations/ghost"])
        .unwrap();
    assert_eq!(report.requested, 2);
    assert_eq!(report.deleted_count, 1);
    assert!(store.is_empty());
}

#[test]
fn scenario_d_single_object_decode_rejects_documents() {
    let (engine, _) = engine();
    let doc = json!({"@context": {}, "@graph": [edge_doc(&edge_id(1), E1, E2, WORKS_FOR)]});

    let err = engine.codec().from_jsonld(&doc, None).unwrap_err();
    assert!(matches!(err, CodecError::InputShape { .. }));
}

// =============================================================================
// Pagination
// =============================================================================

#[test]
fn total_count_is_independent_of_page_window() {
    let (engine, _) = engine();
    seed(
        &engine,
        &[
            (E1, E2, WORKS_FOR),
            (E1, E3, KNOWS),
            (E3, E1, KNOWS),
            (E2, E3, WORKS_FOR),
        ],
    );

    let filter = RelationFilter::new().source(E1);
    let small = engine.list_relation_ids(&filter.clone().page(1, 0)).unwrap();
    let large = engine.list_relation_ids(&filter.page(100, 0)).unwrap();

    assert_eq!(small.items.len(), 1);
    assert_eq!(large.items.len(), 3);
    assert_eq!(small.total_count, 3);
    assert_eq!(small.total_count, large.total_count);
    assert!(small.has_more());
}

#[test]
fn pages_walk_identifiers_in_order() {
    let (engine, _) = engine();
    let created = seed(&engine, &[(E1, E2, WORKS_FOR); 5]);

    let mut walked = Vec::new();
    for offset in (0..5).step_by(2) {
        let page = engine
            .list_relation_ids(&RelationFilter::new().page(2, offset))
            .unwrap();
        walked.extend(page.items);
    }
    assert_eq!(walked, created);
}

#[test]
fn out_of_range_pagination_is_rejected() {
    let (engine, _) = engine();
    for filter in [
        RelationFilter::new().page(101, 0),
        RelationFilter::new().page(0, 0),
        RelationFilter::new().page(10, -5),
    ] {
        let err = engine.list_relations(&filter).unwrap_err();
        assert!(matches!(err, RelationError::InvalidPagination { .. }), "{:?}", filter);
    }
}

#[test]
fn configured_maximum_applies() {
    let config = RelationsConfig {
        max_page_size: 5,
        default_page_size: 5,
        ..RelationsConfig::default()
    };
    let (engine, _) = support::engine_with_config(config);
    assert!(engine.list_relation_ids(&RelationFilter::new().page(5, 0)).is_ok());
    assert!(engine.list_relation_ids(&RelationFilter::new().page(6, 0)).is_err());
}

// =============================================================================
// Direction
// =============================================================================

#[test]
fn direction_all_is_union_of_outgoing_and_incoming() {
    let (engine, _) = engine();
    let r = seed(
        &engine,
        &[
            (E1, E2, WORKS_FOR),
            (E3, E1, KNOWS),
            (E1, E3, KNOWS),
            (E2, E3, WORKS_FOR),
        ],
    );

    let anchor = RelationFilter::new().source(E1);
    let outgoing = ids(&anchor.clone().direction(Direction::Outgoing), &engine);
    let incoming = ids(&anchor.clone().direction(Direction::Incoming), &engine);
    let all = ids(&anchor.clone().direction(Direction::All), &engine);

    assert_eq!(outgoing, set(&[&r[0], &r[2]]));
    assert_eq!(incoming, set(&[&r[1]]));
    assert_eq!(all, outgoing.union(&incoming).cloned().collect());

    let page = engine.list_relation_ids(&anchor).unwrap();
    assert_eq!(page.total_count, 3);
    assert_eq!(page.items.len(), 3);
}

#[test]
fn direction_all_lists_a_self_loop_once() {
    let (engine, _) = engine();
    let r = seed(&engine, &[(E1, E1, KNOWS), (E1, E2, WORKS_FOR), (E3, E1, KNOWS)]);

    let page = engine
        .list_relation_ids(&RelationFilter::new().source(E1).direction(Direction::All))
        .unwrap();
    assert_eq!(page.items, r);
    assert_eq!(page.total_count, 3);

    let mut walked = Vec::new();
    for offset in 0..3 {
        let page = engine
            .list_relation_ids(&RelationFilter::new().source(E1).page(1, offset))
            .unwrap();
        walked.extend(page.items);
    }
    assert_eq!(walked, r);
}

#[test]
fn direction_all_with_other_end_matches_both_orientations() {
    let (engine, _) = engine();
    let r = seed(
        &engine,
        &[(E1, E3, KNOWS), (E3, E1, KNOWS), (E1, E2, WORKS_FOR)],
    );

    let found = ids(&RelationFilter::new().source(E1).destination(E3), &engine);
    assert_eq!(found, set(&[&r[0], &r[1]]));

    let incoming = ids(
        &RelationFilter::new()
            .source(E1)
            .destination(E3)
            .direction(Direction::Incoming),
        &engine,
    );
    assert_eq!(incoming, set(&[&r[1]]));
}

#[test]
fn direction_without_anchor_is_a_no_op() {
    let (engine, _) = engine();
    seed(&engine, &[(E1, E2, WORKS_FOR), (E3, E1, KNOWS)]);

    for direction in [Direction::All, Direction::Incoming, Direction::Outgoing] {
        let page = engine
            .list_relation_ids(&RelationFilter::new().direction(direction))
            .unwrap();
        assert_eq!(page.total_count, 2, "{}", direction);
    }
}

// =============================================================================
// Criteria
// =============================================================================

#[test]
fn relation_type_filter() {
    let (engine, _) = engine();
    let r = seed(&engine, &[(E1, E2, WORKS_FOR), (E1, E3, KNOWS)]);

    let found = ids(&RelationFilter::new().relation_type(KNOWS), &engine);
    assert_eq!(found, set(&[&r[1]]));

    let bracketed = ids(
        &RelationFilter::new().relation_type(format!("<{}>", KNOWS)),
        &engine,
    );
    assert_eq!(bracketed, found);
}

#[test]
fn search_text_matches_literal_properties_case_insensitively() {
    let (engine, _) = engine();
    let mut named = edge_doc(&edge_id(1), E1, E2, WORKS_FOR);
    named["kg:name"] = json!("Employment at ACME");
    let mut described = edge_doc(&edge_id(2), E1, E3, KNOWS);
    described["kg:description"] = json!("met at acme conference");
    engine.create(&json!([named, described])).unwrap();

    let both = ids(&RelationFilter::new().search("Acme"), &engine);
    assert_eq!(both.len(), 2);

    let one = ids(&RelationFilter::new().search("employment"), &engine);
    assert_eq!(one, set(&[&edge_id(1)]));

    // URI values are not searched
    let none = ids(&RelationFilter::new().search("example.org"), &engine);
    assert!(none.is_empty());
}

#[test]
fn search_matching_several_properties_lists_the_edge_once() {
    let (engine, _) = engine();
    let mut both = edge_doc(&edge_id(1), E1, E2, WORKS_FOR);
    both["kg:name"] = json!("Acme job");
    both["kg:description"] = json!("works at acme");
    both["rdfs:label"] = json!(["acme", "ACME employment"]);
    let mut other = edge_doc(&edge_id(2), E1, E3, KNOWS);
    other["kg:name"] = json!("acme meetup");
    engine.create(&json!([both, other])).unwrap();

    let page = engine
        .list_relation_ids(&RelationFilter::new().search("acme"))
        .unwrap();
    assert_eq!(page.items, vec![edge_id(1), edge_id(2)]);
    assert_eq!(page.total_count, 2);

    let first = engine
        .list_relation_ids(&RelationFilter::new().search("acme").page(1, 0))
        .unwrap();
    assert_eq!(first.items, vec![edge_id(1)]);
    assert_eq!(first.total_count, 2);
}

#[test]
fn search_combines_with_structural_filters() {
    let (engine, _) = engine();
    let mut first = edge_doc(&edge_id(1), E1, E2, WORKS_FOR);
    first["kg:name"] = json!("acme job");
    let mut second = edge_doc(&edge_id(2), E3, E2, WORKS_FOR);
    second["kg:name"] = json!("acme contract");
    engine.create(&json!([first, second])).unwrap();

    let found = ids(
        &RelationFilter::new()
            .source(E3)
            .direction(Direction::Outgoing)
            .search("acme"),
        &engine,
    );
    assert_eq!(found, set(&[&edge_id(2)]));
}

// =============================================================================
// Materialization and CRUD
// =============================================================================

#[test]
fn listed_relations_decode_back_to_stored_edges() {
    let (engine, _) = engine();
    let r = seed(&engine, &[(E1, E2, WORKS_FOR), (E3, E1, KNOWS)]);

    let page = engine.list_relations(&RelationFilter::new()).unwrap();
    assert_eq!(page.items.len(), 2);

    let doc = json!({"@context": page.context, "@graph": page.items});
    let decoded = engine.codec().from_jsonld_list(&doc, None).unwrap();
    assert!(decoded.is_complete());

    let expected = vec![
        engine.fetch_edge(&r[0]).unwrap(),
        engine.fetch_edge(&r[1]).unwrap(),
    ];
    assert_eq!(decoded.succeeded, expected);
}

#[test]
fn read_returns_one_object() {
    let (engine, _) = engine();
    let r = seed(&engine, &[(E1, E2, WORKS_FOR)]);

    let doc = engine.read(&r[0]).unwrap();
    assert_eq!(doc["@id"], json!(r[0]));
    assert_eq!(doc["@type"], json!("kg:Edge"));
    assert_eq!(doc["kg:source"], json!({"@id": E1}));
    assert!(doc.get("@graph").is_none());

    let err = engine.read("http://example.org/relations/ghost").unwrap_err();
    assert!(matches!(err, RelationError::NotFound(_)));
}

#[test]
fn partial_create_keeps_successes() {
    let (engine, store) = engine();
    let batch = json!({
        "@context": {"kg": kg::NS},
        "@graph": [
            edge_doc(&edge_id(1), E1, E2, WORKS_FOR),
            {"@id": edge_id(2), "@type": "kg:Edge", "kg:source": {"@id": E1}},
            {"@id": "not a uri", "@type": "kg:Edge"},
            edge_doc(&edge_id(4), E2, E3, KNOWS)
        ]
    });

    let result = engine.create(&batch).unwrap();
    assert_eq!(result.succeeded, vec![edge_id(1), edge_id(4)]);
    let failed: Vec<usize> = result.failed.iter().map(|f| f.index).collect();
    assert_eq!(failed, vec![1, 2]);
    assert_eq!(result.failed[0].id.as_deref(), Some(edge_id(2).as_str()));

    assert_eq!(store.triples_for(&edge_id(2)).len(), 0);
    assert_eq!(store.triples_for(&edge_id(4)).len(), 4);
}

#[test]
fn update_changes_type_only_when_given() {
    let (engine, _) = engine();
    let r = seed(&engine, &[(E1, E2, WORKS_FOR)]);

    let err = engine
        .update(&json!({"@id": r[0], "@type": "kg:Entity"}))
        .unwrap_err();
    assert!(matches!(err, RelationError::NotAnEdge { .. }));

    // Failed update leaves the edge in place
    assert!(engine.fetch_edge(&r[0]).is_ok());
}

#[test]
fn store_holds_nothing_after_failed_create() {
    let (engine, store) = engine();
    let result = engine
        .create(&json!({"@id": edge_id(1), "@type": "kg:Edge"}))
        .unwrap();
    assert!(result.has_failures());
    assert!(store.is_empty());
}

// =============================================================================
// Tracing
// =============================================================================

#[test]
fn list_opens_nested_spans() {
    let (spans, _guard) = support::tracing::init_test_tracing();
    let (engine, _) = engine();
    seed(&engine, &[(E1, E2, WORKS_FOR)]);

    engine
        .list_relations(&RelationFilter::new().source(E1).direction(Direction::Outgoing))
        .unwrap();

    assert!(spans.has_span("relations.create"));
    let list_ids = spans.find_span("relations.list_ids").unwrap();
    assert_eq!(list_ids.parent_name.as_deref(), Some("relations.list"));
    assert_eq!(list_ids.fields.get("direction").map(String::as_str), Some("outgoing"));
}
