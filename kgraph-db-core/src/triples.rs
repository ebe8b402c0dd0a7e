//! Graph object ⇄ triple conversion

use crate::error::{Error, Result};
use crate::object::GraphObject;
use crate::registry::ClassRegistry;
use crate::value::PropertyValue;
use kgraph_graph_ir::{Term, Triple};
use kgraph_vocab::rdf;
use tracing::debug;

/// All triples describing `object`: its `rdf:type` plus one triple per value.
pub fn object_to_triples(object: &GraphObject) -> Vec<Triple> {
    let subject = Term::iri(&object.id);
    let mut triples = Vec::with_capacity(object.property_count() + 1);
    triples.push(Triple::new(
        subject.clone(),
        Term::iri(rdf::TYPE),
        Term::iri(&object.type_iri),
    ));
    for (property, values) in object.properties() {
        let predicate = Term::iri(property);
        for value in values {
            triples.push(Triple::new(subject.clone(), predicate.clone(), value.to_term()));
        }
    }
    triples
}

/// Rebuild one object from the `(predicate, object)` pairs stored for `id`.
///
/// When several `rdf:type`s are stored, the first one (in IRI order) known
/// to the registry decides the variant.
pub fn object_from_triples<'a>(
    id: &str,
    triples: impl IntoIterator<Item = (&'a Term, &'a Term)>,
    classes: &ClassRegistry,
) -> Result<GraphObject> {
    let mut types: Vec<&str> = Vec::new();
    let mut rest: Vec<(&str, &Term)> = Vec::new();

    for (p, o) in triples {
        let Some(predicate) = p.as_iri() else {
            continue;
        };
        match (predicate, o.as_iri()) {
            (rdf::TYPE, Some(type_iri)) => types.push(type_iri),
            _ => rest.push((predicate, o)),
        }
    }

    if types.is_empty() {
        return Err(Error::MissingType { id: id.to_string() });
    }
    types.sort_unstable();
    types.dedup();
    let type_iri = types
        .iter()
        .copied()
        .find(|t| classes.is_known(t))
        .ok_or_else(|| Error::UnknownType(types[0].to_string()))?;
    if types.len() > 1 {
        debug!(id = %id, chosen = %type_iri, count = types.len(), "object has several types");
    }

    let mut object = classes
        .instantiate(id, type_iri)
        .ok_or_else(|| Error::UnknownType(type_iri.to_string()))?;
    for (predicate, term) in rest {
        object.add(predicate, PropertyValue::from_term(term, predicate)?);
    }
    Ok(object)
}
