//! In-memory triple store

use crate::error::{Result, StoreError};
use crate::pattern::{GraphPattern, Pattern, PatternTerm, SelectQuery, Solution, TriplePattern};
use crate::store::TripleStore;
use kgraph_graph_ir::{Term, Triple};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, trace};

/// `(predicate, object)` pairs per subject
type SubjectIndex = BTreeMap<Arc<str>, BTreeSet<(Term, Term)>>;

/// A triple store held in memory behind a read/write lock.
///
/// Readers run concurrently; each write takes the lock once per call.
#[derive(Debug, Default)]
pub struct MemoryTripleStore {
    subjects: RwLock<SubjectIndex>,
}

impl MemoryTripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored triples
    pub fn len(&self) -> usize {
        self.subjects.read().values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.read().is_empty()
    }

    /// All triples about `subject`, in predicate/object order.
    pub fn triples_for(&self, subject: &str) -> Vec<Triple> {
        let index = self.subjects.read();
        index
            .get(subject)
            .map(|pairs| {
                pairs
                    .iter()
                    .map(|(p, o)| Triple::new(Term::iri(subject), p.clone(), o.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Snapshot of every triple, sorted.
    pub fn triples(&self) -> Vec<Triple> {
        let index = self.subjects.read();
        index
            .iter()
            .flat_map(|(s, pairs)| {
                pairs
                    .iter()
                    .map(move |(p, o)| Triple::new(Term::Iri(s.clone()), p.clone(), o.clone()))
            })
            .collect()
    }
}

impl TripleStore for MemoryTripleStore {
    fn insert(&self, triples: &[Triple]) -> Result<usize> {
        for t in triples {
            if t.s.as_iri().is_none() || t.p.as_iri().is_none() {
                return Err(StoreError::InvalidTriple(t.to_string()));
            }
        }
        let mut index = self.subjects.write();
        let mut added = 0;
        for t in triples {
            let Term::Iri(subject) = &t.s else { continue };
            if index
                .entry(subject.clone())
                .or_default()
                .insert((t.p.clone(), t.o.clone()))
            {
                added += 1;
            }
        }
        debug!(requested = triples.len(), added, "inserted triples");
        Ok(added)
    }

    fn delete(&self, subjects: &[&str]) -> Result<usize> {
        let mut index = self.subjects.write();
        let removed = subjects
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|s| index.remove(**s).is_some())
            .count();
        debug!(requested = subjects.len(), removed, "deleted subjects");
        Ok(removed)
    }

    fn query_pattern(&self, query: &SelectQuery) -> Result<Vec<Solution>> {
        trace!(query = %query, "evaluating");
        let bindable = query.pattern.variables();
        for var in query.projection.iter().chain(query.order_by.iter().map(|o| &o.var)) {
            if !bindable.contains(var) {
                return Err(StoreError::invalid_pattern(format!(
                    "?{var} is not bound by the pattern"
                )));
            }
        }

        let index = self.subjects.read();
        let mut rows: Vec<Solution> = eval_group(&index, &query.pattern, vec![Solution::new()])
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .filter(|(k, _)| query.projection.contains(k))
                    .collect()
            })
            .collect();
        drop(index);

        rows.sort_by(|a, b| {
            for key in &query.order_by {
                let ord = a.get(&key.var).cmp(&b.get(&key.var));
                let ord = if key.descending { ord.reverse() } else { ord };
                if ord.is_ne() {
                    return ord;
                }
            }
            std::cmp::Ordering::Equal
        });
        if query.distinct {
            let mut seen = BTreeSet::new();
            rows.retain(|row| seen.insert(row.clone()));
        }

        let rows: Vec<Solution> = rows
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();
        debug!(rows = rows.len(), "query evaluated");
        Ok(rows)
    }

    fn count(&self, pattern: &GraphPattern, var: &str) -> Result<usize> {
        if !pattern.variables().iter().any(|v| v.as_ref() == var) {
            return Err(StoreError::invalid_pattern(format!(
                "?{var} is not bound by the pattern"
            )));
        }
        let index = self.subjects.read();
        let distinct: BTreeSet<Term> = eval_group(&index, pattern, vec![Solution::new()])
            .into_iter()
            .filter_map(|mut row| row.remove(var))
            .collect();
        Ok(distinct.len())
    }
}

/// Evaluate a group: join its triples and unions in order, then apply its
/// filters to the joined rows.
fn eval_group(index: &SubjectIndex, group: &GraphPattern, input: Vec<Solution>) -> Vec<Solution> {
    let mut rows = input;
    let mut filters = Vec::new();
    for pattern in &group.patterns {
        match pattern {
            Pattern::Triple(tp) => {
                rows = rows
                    .into_iter()
                    .flat_map(|row| match_triple(index, tp, row))
                    .collect();
            }
            Pattern::Union(branches) => {
                rows = rows
                    .into_iter()
                    .flat_map(|row| {
                        branches
                            .iter()
                            .flat_map(move |branch| eval_group(index, branch, vec![row.clone()]))
                            .collect::<Vec<_>>()
                    })
                    .collect();
            }
            Pattern::Filter(expr) => filters.push(expr),
        }
        if rows.is_empty() {
            return rows;
        }
    }
    rows.retain(|row| filters.iter().all(|f| f.is_satisfied(row)));
    rows
}

/// Extend `row` with every binding that makes `tp` match a stored triple.
fn match_triple(index: &SubjectIndex, tp: &TriplePattern, row: Solution) -> Vec<Solution> {
    let candidates: Vec<(&Arc<str>, &BTreeSet<(Term, Term)>)> = match tp.s.resolve(&row) {
        Some(Term::Iri(s)) => index.get_key_value(s.as_ref()).into_iter().collect(),
        Some(_) => return Vec::new(),
        None => index.iter().collect(),
    };
    let p_bound = tp.p.resolve(&row).cloned();
    let o_bound = tp.o.resolve(&row).cloned();

    let mut out = Vec::new();
    for (subject, pairs) in candidates {
        for (p, o) in pairs {
            if p_bound.as_ref().is_some_and(|b| b != p) || o_bound.as_ref().is_some_and(|b| b != o) {
                continue;
            }
            let subject_term = Term::Iri(subject.clone());
            let mut next = row.clone();
            if bind(&mut next, &tp.s, &subject_term)
                && bind(&mut next, &tp.p, p)
                && bind(&mut next, &tp.o, o)
            {
                out.push(next);
            }
        }
    }
    out
}

/// Bind a variable position; false when it conflicts with an earlier
/// binding in the same triple (e.g. `?x ?p ?x`).
fn bind(row: &mut Solution, position: &PatternTerm, value: &Term) -> bool {
    let PatternTerm::Var(var) = position else {
        return true;
    };
    match row.get(var) {
        Some(existing) => existing == value,
        None => {
            row.insert(var.clone(), value.clone());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;
    use pretty_assertions::assert_eq;

    const P: &str = "http://example.org/p";
    const NAME: &str = "http://example.org/name";

    fn store() -> MemoryTripleStore {
        let store = MemoryTripleStore::new();
        store
            .insert(&[
                Triple::new(Term::iri("http://example.org/a"), Term::iri(P), Term::iri("http://example.org/b")),
                Triple::new(Term::iri("http://example.org/b"), Term::iri(P), Term::iri("http://example.org/c")),
                Triple::new(Term::iri("http://example.org/a"), Term::iri(NAME), Term::string("Alpha")),
                Triple::new(Term::iri("http://example.org/c"), Term::iri(NAME), Term::string("Gamma")),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_insert_is_set_semantics() {
        let store = store();
        let again = store
            .insert(&[Triple::new(
                Term::iri("http://example.org/a"),
                Term::iri(P),
                Term::iri("http://example.org/b"),
            )])
            .unwrap();
        assert_eq!(again, 0);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_rejects_literal_subject() {
        let err = MemoryTripleStore::new()
            .insert(&[Triple::new(Term::string("x"), Term::iri(P), Term::string("y"))])
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTriple(_)));
    }

    #[test]
    fn test_join_and_filter() {
        let pattern = GraphPattern::new()
            .triple(PatternTerm::var("x"), PatternTerm::iri(P), PatternTerm::var("y"))
            .triple(PatternTerm::var("y"), PatternTerm::iri(P), PatternTerm::var("z"));
        let rows = store()
            .query_pattern(&SelectQuery::new(&["x", "z"], pattern))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("z"), Some(&Term::iri("http://example.org/c")));
        assert!(rows[0].get("y").is_none());

        let filtered = GraphPattern::new()
            .triple(PatternTerm::var("s"), PatternTerm::iri(NAME), PatternTerm::var("n"))
            .filter(Expression::contains_ignore_case(Expression::var("n"), "GAM"));
        let rows = store()
            .query_pattern(&SelectQuery::new(&["s"], filtered))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("s"), Some(&Term::iri("http://example.org/c")));
    }

    #[test]
    fn test_union_distinct_order_slice() {
        let b = PatternTerm::iri("http://example.org/b");
        let pattern = GraphPattern::new().union(vec![
            GraphPattern::new().triple(PatternTerm::var("n"), PatternTerm::iri(P), b.clone()),
            GraphPattern::new().triple(b, PatternTerm::iri(P), PatternTerm::var("n")),
            GraphPattern::new().triple(PatternTerm::var("n"), PatternTerm::iri(NAME), PatternTerm::var("label")),
        ]);
        let store = store();
        let all = store
            .query_pattern(&SelectQuery::new(&["n"], pattern.clone()).distinct().order_by("n"))
            .unwrap();
        let ids: Vec<String> = all.iter().map(|r| r["n"].lexical()).collect();
        assert_eq!(ids, vec!["http://example.org/a", "http://example.org/c"]);

        let page = store
            .query_pattern(
                &SelectQuery::new(&["n"], pattern.clone())
                    .distinct()
                    .order_by("n")
                    .offset(1)
                    .limit(1),
            )
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0]["n"].lexical(), "http://example.org/c");
        assert_eq!(store.count(&pattern, "n").unwrap(), 2);
    }

    #[test]
    fn test_delete_counts_subjects() {
        let store = store();
        let removed = store
            .delete(&["http://example.org/a", "http://example.org/missing", "http://example.org/a"])
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.triples_for("http://example.org/a").is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unknown_projection_var() {
        let pattern = GraphPattern::new().triple(
            PatternTerm::var("s"),
            PatternTerm::iri(P),
            PatternTerm::var("o"),
        );
        assert!(store()
            .query_pattern(&SelectQuery::new(&["nope"], pattern.clone()))
            .is_err());
        assert!(store().count(&pattern, "nope").is_err());
    }
}
