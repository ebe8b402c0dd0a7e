//! Context round trips as the codecs use them: build a context for a set of
//! namespaces, compact with it, then expand with the same context.

use kgraph_graph_json_ld::{expand, iri, ContextCompactor, JsonLdError, ParsedContext, TypeValue};
use pretty_assertions::assert_eq;
use serde_json::json;

fn parse(value: serde_json::Value) -> ParsedContext {
    ParsedContext::parse(None, &value).unwrap()
}

#[test]
fn test_compact_then_expand() {
    let ctx = parse(json!({
        "kg": "https://ns.kgraph.dev/core#",
        "rel": "urn:kg:rel:",
        "schema": "http://schema.org/",
        "id": "@id",
        "type": "@type"
    }));
    let compactor = ContextCompactor::new(&ctx);

    for full in [
        "https://ns.kgraph.dev/core#relationType",
        "urn:kg:rel:worksFor",
        "http://schema.org/Person",
    ] {
        let compacted = compactor.compact_vocab(full);
        assert_ne!(compacted, full);
        assert_eq!(expand::try_iri(&compacted, &ctx, true).unwrap(), full);
    }
}

#[test]
fn test_document_context_overrides_base() {
    let base = parse(json!({"ex": "http://example.org/v1/"}));
    let ctx = ParsedContext::parse(Some(&base), &json!({"ex": "http://example.org/v2/"})).unwrap();
    assert_eq!(expand::try_iri("ex:a", &ctx, true).unwrap(), "http://example.org/v2/a");
}

#[test]
fn test_document_context_masks_base_prefix() {
    let base = parse(json!({"geo": "http://www.opengis.net/ont/geosparql#"}));
    let ctx = ParsedContext::parse(
        Some(&base),
        &json!({"geo": null, "gs": "http://www.opengis.net/ont/geosparql#"}),
    )
    .unwrap();

    assert_eq!(expand::iri("geo:37.78,-122.39", &ctx, false), "geo:37.78,-122.39");
    assert_eq!(
        expand::iri("gs:hasGeometry", &ctx, true),
        "http://www.opengis.net/ont/geosparql#hasGeometry"
    );
}

#[test]
fn test_type_coercion_visible_through_details() {
    let ctx = parse(json!({
        "kg": "https://ns.kgraph.dev/core#",
        "source": {"@id": "kg:source", "@type": "@id"},
        "when": {"@id": "kg:when", "@type": "http://www.w3.org/2001/XMLSchema#dateTime"}
    }));

    assert_eq!(
        expand::details("source", &ctx, true).1.unwrap().type_,
        Some(TypeValue::Id)
    );
    assert_eq!(
        expand::details("when", &ctx, true).1.unwrap().type_,
        Some(TypeValue::Iri(
            "http://www.w3.org/2001/XMLSchema#dateTime".to_string()
        ))
    );
}

#[test]
fn test_unresolvable_prefix_reported_with_term() {
    let ctx = parse(json!({"kg": "https://ns.kgraph.dev/core#"}));
    match expand::try_iri("foaf:name", &ctx, true) {
        Err(JsonLdError::Unresolvable { term }) => assert_eq!(term, "foaf:name"),
        other => panic!("expected Unresolvable, got {:?}", other),
    }
}

#[test]
fn test_split_and_compact_agree() {
    let ctx = parse(json!({"core": "https://ns.kgraph.dev/core#"}));
    let (ns, local) = iri::split_namespace("https://ns.kgraph.dev/core#Edge").unwrap();
    assert_eq!(ns, "https://ns.kgraph.dev/core#");
    assert_eq!(
        ContextCompactor::new(&ctx).compact_vocab("https://ns.kgraph.dev/core#Edge"),
        format!("core:{}", local)
    );
}
