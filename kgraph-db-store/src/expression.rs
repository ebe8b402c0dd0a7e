//! Filter expressions
//!
//! All operators are function calls, so evaluation and rendering dispatch
//! on one [`Function`] enum.

use crate::pattern::Solution;
use kgraph_graph_ir::Term;
use std::fmt;
use std::sync::Arc;

/// Built-in functions usable in a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Eq,
    And,
    Or,
    /// First argument equals any of the rest
    In,
    /// String containment of the second argument in the first
    Contains,
    LCase,
    Str,
    IsLiteral,
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::Eq => "=",
            Function::And => "&&",
            Function::Or => "||",
            Function::In => "IN",
            Function::Contains => "CONTAINS",
            Function::LCase => "LCASE",
            Function::Str => "STR",
            Function::IsLiteral => "isLiteral",
        }
    }
}

/// Filter expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Var(Arc<str>),
    Const(Term),
    Call {
        func: Function,
        args: Vec<Expression>,
    },
}

/// Result of evaluating an expression against one solution
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Term(Term),
    Bool(bool),
}

impl Expression {
    pub fn var(name: &str) -> Self {
        Expression::Var(Arc::from(name))
    }

    pub fn iri(iri: &str) -> Self {
        Expression::Const(Term::iri(iri))
    }

    pub fn string(s: &str) -> Self {
        Expression::Const(Term::string(s))
    }

    fn call(func: Function, args: Vec<Expression>) -> Self {
        Expression::Call { func, args }
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::call(Function::Eq, vec![left, right])
    }

    pub fn and(args: Vec<Expression>) -> Self {
        Self::call(Function::And, args)
    }

    pub fn or(args: Vec<Expression>) -> Self {
        Self::call(Function::Or, args)
    }

    /// `expr IN (list...)`
    pub fn in_list(expr: Expression, list: Vec<Expression>) -> Self {
        let mut args = Vec::with_capacity(list.len() + 1);
        args.push(expr);
        args.extend(list);
        Self::call(Function::In, args)
    }

    pub fn contains(haystack: Expression, needle: Expression) -> Self {
        Self::call(Function::Contains, vec![haystack, needle])
    }

    pub fn lcase(expr: Expression) -> Self {
        Self::call(Function::LCase, vec![expr])
    }

    pub fn str(expr: Expression) -> Self {
        Self::call(Function::Str, vec![expr])
    }

    pub fn is_literal(expr: Expression) -> Self {
        Self::call(Function::IsLiteral, vec![expr])
    }

    /// Case-insensitive substring match over the string form of a literal.
    pub fn contains_ignore_case(expr: Expression, needle: &str) -> Self {
        Self::and(vec![
            Self::is_literal(expr.clone()),
            Self::contains(
                Self::lcase(Self::str(expr)),
                Self::string(&needle.to_lowercase()),
            ),
        ])
    }

    /// Variables referenced by this expression
    pub fn variables(&self) -> Vec<Arc<str>> {
        match self {
            Expression::Var(v) => vec![v.clone()],
            Expression::Const(_) => Vec::new(),
            Expression::Call { args, .. } => args.iter().flat_map(|a| a.variables()).collect(),
        }
    }

    /// Evaluate; `None` is an evaluation error (unbound variable, type error).
    pub fn eval(&self, solution: &Solution) -> Option<Value> {
        match self {
            Expression::Var(v) => solution.get(v.as_ref()).cloned().map(Value::Term),
            Expression::Const(t) => Some(Value::Term(t.clone())),
            Expression::Call { func, args } => eval_call(*func, args, solution),
        }
    }

    /// Effective boolean value; errors count as false.
    pub fn is_satisfied(&self, solution: &Solution) -> bool {
        matches!(self.eval(solution), Some(Value::Bool(true)))
    }
}

fn eval_call(func: Function, args: &[Expression], solution: &Solution) -> Option<Value> {
    match func {
        Function::And => Some(Value::Bool(args.iter().all(|a| a.is_satisfied(solution)))),
        Function::Or => Some(Value::Bool(args.iter().any(|a| a.is_satisfied(solution)))),
        Function::Eq => {
            let [left, right] = args else { return None };
            Some(Value::Bool(left.eval(solution)? == right.eval(solution)?))
        }
        Function::In => {
            let (first, rest) = args.split_first()?;
            let needle = first.eval(solution)?;
            Some(Value::Bool(
                rest.iter().any(|candidate| candidate.eval(solution).as_ref() == Some(&needle)),
            ))
        }
        Function::Contains => {
            let [haystack, needle] = args else { return None };
            let haystack = string_arg(haystack, solution)?;
            let needle = string_arg(needle, solution)?;
            Some(Value::Bool(haystack.contains(&needle)))
        }
        Function::LCase => {
            let [arg] = args else { return None };
            Some(Value::Term(Term::string(string_arg(arg, solution)?.to_lowercase())))
        }
        Function::Str => {
            let [arg] = args else { return None };
            match arg.eval(solution)? {
                Value::Term(t) => Some(Value::Term(Term::string(t.lexical()))),
                Value::Bool(_) => None,
            }
        }
        Function::IsLiteral => {
            let [arg] = args else { return None };
            match arg.eval(solution)? {
                Value::Term(t) => Some(Value::Bool(t.is_literal())),
                Value::Bool(_) => Some(Value::Bool(true)),
            }
        }
    }
}

/// The lexical form of a literal argument. IRIs are a type error.
fn string_arg(expr: &Expression, solution: &Solution) -> Option<String> {
    match expr.eval(solution)? {
        Value::Term(t) if t.is_literal() => Some(t.lexical()),
        _ => None,
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Var(v) => write!(f, "?{v}"),
            Expression::Const(t) => write!(f, "{t}"),
            Expression::Call { func, args } => match func {
                Function::Eq | Function::And | Function::Or => {
                    f.write_str("(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, " {} ", func.name())?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(")")
                }
                Function::In => {
                    let Some((first, rest)) = args.split_first() else {
                        return f.write_str("false");
                    };
                    write!(f, "{first} IN (")?;
                    write_list(f, rest)?;
                    f.write_str(")")
                }
                _ => {
                    write!(f, "{}(", func.name())?;
                    write_list(f, args)?;
                    f.write_str(")")
                }
            },
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
