//! Canonical AST for relation trees.
//!
//! Nodes render as nested JSON arrays `[tag, operand_ast…, params]`. The
//! AST exists for structural identity (deep equality, fingerprints); it is
//! never executed.

use crate::predicate::Predicate;
use crate::schema::AttrList;
use crate::tuple::{Tuple, Value};

pub type Ast = serde_json::Value;

/// `[tag]`
pub fn leaf(tag: &str) -> Ast {
    Ast::Array(vec![Ast::String(tag.to_string())])
}

/// `[tag, params]`
pub fn leaf_with(tag: &str, params: Ast) -> Ast {
    Ast::Array(vec![Ast::String(tag.to_string()), params])
}

/// `[tag, operand, params]`
pub fn unary(tag: &str, operand: Ast, params: Ast) -> Ast {
    Ast::Array(vec![Ast::String(tag.to_string()), operand, params])
}

/// `[tag, left, right, params]`
pub fn binary(tag: &str, left: Ast, right: Ast, params: Ast) -> Ast {
    Ast::Array(vec![Ast::String(tag.to_string()), left, right, params])
}

/// JSON form of a value. Non-finite floats degrade to null so the
/// conversion stays infallible.
pub fn value_ast(value: &Value) -> Ast {
    match value {
        Value::Null => Ast::Null,
        Value::Bool(b) => Ast::Bool(*b),
        Value::Int(i) => Ast::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Ast::Number)
            .unwrap_or(Ast::Null),
        Value::Str(s) => Ast::String(s.clone()),
        Value::Tuple(t) => tuple_ast(t),
    }
}

/// JSON object form of a tuple, attributes in tuple order.
pub fn tuple_ast(tuple: &Tuple) -> Ast {
    Ast::Object(
        tuple
            .iter()
            .map(|(k, v)| (k.to_string(), value_ast(v)))
            .collect(),
    )
}

/// JSON array of attribute names, in list order.
pub fn attrs_ast(attrs: &AttrList) -> Ast {
    Ast::Array(
        attrs
            .iter()
            .map(|a| Ast::String(a.to_string()))
            .collect(),
    )
}

/// `[tag, …]` form of a predicate, tags lowercased.
pub fn predicate_ast(predicate: &Predicate) -> Ast {
    fn tagged(tag: &str, attr: &str, value: &Value) -> Ast {
        Ast::Array(vec![
            Ast::String(tag.to_string()),
            Ast::String(attr.to_string()),
            value_ast(value),
        ])
    }
    fn nary(tag: &str, ps: &[Predicate]) -> Ast {
        let mut items = vec![Ast::String(tag.to_string())];
        items.extend(ps.iter().map(predicate_ast));
        Ast::Array(items)
    }
    match predicate {
        Predicate::True => leaf("true"),
        Predicate::False => leaf("false"),
        Predicate::Eq(a, v) => tagged("eq", a, v),
        Predicate::Neq(a, v) => tagged("neq", a, v),
        Predicate::Gt(a, v) => tagged("gt", a, v),
        Predicate::Gte(a, v) => tagged("gte", a, v),
        Predicate::Lt(a, v) => tagged("lt", a, v),
        Predicate::Lte(a, v) => tagged("lte", a, v),
        Predicate::And(ps) => nary("and", ps),
        Predicate::Or(ps) => nary("or", ps),
        Predicate::Not(p) => Ast::Array(vec![Ast::String("not".to_string()), predicate_ast(p)]),
    }
}
