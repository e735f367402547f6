//! Boolean predicates over tuple attributes.
//!
//! Predicates are immutable expression trees with structural equality.
//! Rewrite rules only need `free_variables` and equality; evaluation is
//! what `Restrict` uses at tuple time.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::AttrList;
use crate::tuple::{Tuple, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Predicate {
    True,
    False,
    Eq(String, Value),
    Neq(String, Value),
    Gt(String, Value),
    Gte(String, Value),
    Lt(String, Value),
    Lte(String, Value),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq(attr.into(), value.into())
    }

    /// Conjunction of equalities, one per pair. Empty input is `True`.
    pub fn eq_all<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let ps: Vec<Predicate> = pairs
            .into_iter()
            .map(|(k, v)| Predicate::eq(k, v))
            .collect();
        match ps.len() {
            0 => Predicate::True,
            1 => ps.into_iter().next().unwrap_or(Predicate::True),
            _ => Predicate::And(ps),
        }
    }

    pub fn neq(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Neq(attr.into(), value.into())
    }

    pub fn gt(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Gt(attr.into(), value.into())
    }

    pub fn gte(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Gte(attr.into(), value.into())
    }

    pub fn lt(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Lt(attr.into(), value.into())
    }

    pub fn lte(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Lte(attr.into(), value.into())
    }

    /// Conjunction, flattened to one `And` level. Tautologies simplify:
    /// `True` is the neutral element, `False` annihilates.
    pub fn and(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (Predicate::False, _) | (_, Predicate::False) => Predicate::False,
            (Predicate::And(mut xs), Predicate::And(ys)) => {
                xs.extend(ys);
                Predicate::And(xs)
            }
            (Predicate::And(mut xs), p) => {
                xs.push(p);
                Predicate::And(xs)
            }
            (p, Predicate::And(mut ys)) => {
                ys.insert(0, p);
                Predicate::And(ys)
            }
            (p, q) => Predicate::And(vec![p, q]),
        }
    }

    /// Disjunction, flattened like [`Predicate::and`].
    pub fn or(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::False, p) | (p, Predicate::False) => p,
            (Predicate::True, _) | (_, Predicate::True) => Predicate::True,
            (Predicate::Or(mut xs), Predicate::Or(ys)) => {
                xs.extend(ys);
                Predicate::Or(xs)
            }
            (Predicate::Or(mut xs), p) => {
                xs.push(p);
                Predicate::Or(xs)
            }
            (p, Predicate::Or(mut ys)) => {
                ys.insert(0, p);
                Predicate::Or(ys)
            }
            (p, q) => Predicate::Or(vec![p, q]),
        }
    }

    /// Negation; collapses double negation.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            Predicate::True => Predicate::False,
            Predicate::False => Predicate::True,
            Predicate::Not(inner) => *inner,
            p => Predicate::Not(Box::new(p)),
        }
    }

    pub fn tautology(&self) -> bool {
        matches!(self, Predicate::True)
    }

    pub fn contradiction(&self) -> bool {
        matches!(self, Predicate::False)
    }

    /// Attributes this predicate reads, in first-reference order.
    pub fn free_variables(&self) -> AttrList {
        let mut vars = AttrList::new();
        self.collect_free_variables(&mut vars);
        vars
    }

    fn collect_free_variables(&self, into: &mut AttrList) {
        match self {
            Predicate::True | Predicate::False => {}
            Predicate::Eq(a, _)
            | Predicate::Neq(a, _)
            | Predicate::Gt(a, _)
            | Predicate::Gte(a, _)
            | Predicate::Lt(a, _)
            | Predicate::Lte(a, _) => into.push_unique(a.clone()),
            Predicate::And(ps) | Predicate::Or(ps) => {
                for p in ps {
                    p.collect_free_variables(into);
                }
            }
            Predicate::Not(p) => p.collect_free_variables(into),
        }
    }

    /// Evaluates against a tuple. Referencing an attribute the tuple lacks
    /// is an `Eval` error, as is ordering values that have no order.
    pub fn eval(&self, tuple: &Tuple) -> Result<bool> {
        match self {
            Predicate::True => Ok(true),
            Predicate::False => Ok(false),
            Predicate::Eq(a, v) => Ok(values_eq(fetch(tuple, a)?, v)),
            Predicate::Neq(a, v) => Ok(!values_eq(fetch(tuple, a)?, v)),
            Predicate::Gt(a, v) => Ok(ordered(fetch(tuple, a)?, v)? == Ordering::Greater),
            Predicate::Gte(a, v) => Ok(ordered(fetch(tuple, a)?, v)? != Ordering::Less),
            Predicate::Lt(a, v) => Ok(ordered(fetch(tuple, a)?, v)? == Ordering::Less),
            Predicate::Lte(a, v) => Ok(ordered(fetch(tuple, a)?, v)? != Ordering::Greater),
            Predicate::And(ps) => {
                for p in ps {
                    if !p.eval(tuple)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Predicate::Or(ps) => {
                for p in ps {
                    if p.eval(tuple)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::Not(p) => Ok(!p.eval(tuple)?),
        }
    }
}

fn fetch<'a>(tuple: &'a Tuple, attr: &str) -> Result<&'a Value> {
    tuple.get(attr).ok_or_else(|| Error::unknown_attribute(attr))
}

/// Equality across variants: ints and floats compare numerically, the rest
/// by the `Value` total order.
fn values_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => {
            (*x as f64).total_cmp(y) == Ordering::Equal
        }
        _ => a == b,
    }
}

/// Ordering for comparison predicates. Only numbers against numbers and
/// strings against strings have an order here; anything else is an error.
fn ordered(a: &Value, b: &Value) -> Result<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => Ok(x.total_cmp(y)),
        (Value::Int(x), Value::Float(y)) => Ok((*x as f64).total_cmp(y)),
        (Value::Float(x), Value::Int(y)) => Ok(x.total_cmp(&(*y as f64))),
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        _ => Err(Error::Eval(format!("cannot order {a} against {b}"))),
    }
}
