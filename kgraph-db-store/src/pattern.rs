//! Graph patterns and select queries
//!
//! Patterns use expanded IRIs only. `Display` renders SPARQL 1.1 text, so a
//! SPARQL-backed store can run the query as-is and logs show exactly what
//! was asked.

use crate::expression::Expression;
use kgraph_graph_ir::Term;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One row of variable bindings
pub type Solution = BTreeMap<Arc<str>, Term>;

/// A position in a triple pattern: variable or constant
#[derive(Debug, Clone, PartialEq)]
pub enum PatternTerm {
    Var(Arc<str>),
    Const(Term),
}

impl PatternTerm {
    pub fn var(name: &str) -> Self {
        PatternTerm::Var(Arc::from(name))
    }

    pub fn iri(iri: &str) -> Self {
        PatternTerm::Const(Term::iri(iri))
    }

    pub fn as_var(&self) -> Option<&str> {
        match self {
            PatternTerm::Var(v) => Some(v),
            PatternTerm::Const(_) => None,
        }
    }

    /// The constant this position takes under `solution`, if bound.
    pub fn resolve<'a>(&'a self, solution: &'a Solution) -> Option<&'a Term> {
        match self {
            PatternTerm::Var(v) => solution.get(v.as_ref()),
            PatternTerm::Const(t) => Some(t),
        }
    }
}

impl From<Term> for PatternTerm {
    fn from(t: Term) -> Self {
        PatternTerm::Const(t)
    }
}

impl fmt::Display for PatternTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternTerm::Var(v) => write!(f, "?{v}"),
            PatternTerm::Const(t) => write!(f, "{t}"),
        }
    }
}

/// A basic triple pattern (subject, predicate, object)
#[derive(Debug, Clone, PartialEq)]
pub struct TriplePattern {
    pub s: PatternTerm,
    pub p: PatternTerm,
    pub o: PatternTerm,
}

impl TriplePattern {
    pub fn new(s: PatternTerm, p: PatternTerm, o: PatternTerm) -> Self {
        Self { s, p, o }
    }

    pub fn variables(&self) -> Vec<Arc<str>> {
        [&self.s, &self.p, &self.o]
            .into_iter()
            .filter_map(|t| match t {
                PatternTerm::Var(v) => Some(v.clone()),
                PatternTerm::Const(_) => None,
            })
            .collect()
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}

/// One element of a group graph pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Triple(TriplePattern),
    /// Applies to the whole enclosing group
    Filter(Expression),
    /// Union of branches; any branch may match
    Union(Vec<GraphPattern>),
}

/// A group graph pattern: `{ ... }`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphPattern {
    pub patterns: Vec<Pattern>,
}

impl GraphPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triple(mut self, s: PatternTerm, p: PatternTerm, o: PatternTerm) -> Self {
        self.patterns
            .push(Pattern::Triple(TriplePattern::new(s, p, o)));
        self
    }

    pub fn filter(mut self, expr: Expression) -> Self {
        self.patterns.push(Pattern::Filter(expr));
        self
    }

    pub fn union(mut self, branches: Vec<GraphPattern>) -> Self {
        self.patterns.push(Pattern::Union(branches));
        self
    }

    pub fn push(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Every variable the group can bind (filters excluded)
    pub fn variables(&self) -> Vec<Arc<str>> {
        let mut vars: Vec<Arc<str>> = self
            .patterns
            .iter()
            .flat_map(|p| match p {
                Pattern::Triple(tp) => tp.variables(),
                Pattern::Filter(_) => Vec::new(),
                Pattern::Union(branches) => branches.iter().flat_map(|b| b.variables()).collect(),
            })
            .collect();
        vars.sort();
        vars.dedup();
        vars
    }

    /// `SELECT (COUNT(DISTINCT ?var) AS ?count) WHERE { ... }`
    pub fn count_query(&self, var: &str) -> String {
        format!("SELECT (COUNT(DISTINCT ?{var}) AS ?count) WHERE {self}")
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth + 1);
        f.write_str("{\n")?;
        for pattern in &self.patterns {
            match pattern {
                Pattern::Triple(tp) => writeln!(f, "{pad}{tp}")?,
                Pattern::Filter(expr) => writeln!(f, "{pad}FILTER({expr})")?,
                Pattern::Union(branches) => {
                    f.write_str(&pad)?;
                    for (i, branch) in branches.iter().enumerate() {
                        if i > 0 {
                            f.write_str(" UNION ")?;
                        }
                        branch.fmt_indented(f, depth + 1)?;
                    }
                    f.write_str("\n")?;
                }
            }
        }
        write!(f, "{}}}", "  ".repeat(depth))
    }
}

impl fmt::Display for GraphPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Sort key direction
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub var: Arc<str>,
    pub descending: bool,
}

/// `SELECT [DISTINCT] ?vars WHERE { ... } ORDER BY ... LIMIT n OFFSET m`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub distinct: bool,
    pub projection: Vec<Arc<str>>,
    pub pattern: GraphPattern,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl SelectQuery {
    /// Select `vars` from `pattern`, no ordering or slicing.
    pub fn new(vars: &[&str], pattern: GraphPattern) -> Self {
        Self {
            distinct: false,
            projection: vars.iter().map(|v| Arc::from(*v)).collect(),
            pattern,
            order_by: Vec::new(),
            limit: None,
            offset: 0,
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn order_by(mut self, var: &str) -> Self {
        self.order_by.push(OrderBy {
            var: Arc::from(var),
            descending: false,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        for var in &self.projection {
            write!(f, "?{var} ")?;
        }
        write!(f, "WHERE {}", self.pattern)?;
        if !self.order_by.is_empty() {
            f.write_str("\nORDER BY")?;
            for key in &self.order_by {
                if key.descending {
                    write!(f, " DESC(?{})", key.var)?;
                } else {
                    write!(f, " ?{}", key.var)?;
                }
            }
        }
        if let Some(limit) = self.limit {
            write!(f, "\nLIMIT {limit}")?;
        }
        if self.offset > 0 {
            write!(f, "\nOFFSET {}", self.offset)?;
        }
        Ok(())
    }
}
