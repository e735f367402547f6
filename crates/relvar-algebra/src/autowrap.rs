//! Autowrap: structures flat tuples by attribute-name convention.
//!
//! `{ a: 1, b_x: 2, b_y: 3 }` becomes `{ a: 1, b: { x: 2, y: 3 } }` with
//! the default `_` split token, any number of levels deep. A configurable
//! postprocessor then clears left-join noise: top-level nested tuples
//! whose leaves are all null.

use std::any::Any;

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;
use relvar_core::schema::wrapped_roots;
use relvar_core::tuple::Value;
use relvar_core::{AttrList, Predicate, Tuple};

use crate::options::{AutowrapOptions, PageOptions, Postprocessor, Remover};
use crate::page::OrderBy;
use crate::relation::{RelOp, Relation, Tuples};

pub struct Autowrap {
    typ: RelType,
    operand: Relation,
    options: AutowrapOptions,
}

impl Autowrap {
    pub fn new(typ: RelType, operand: Relation, options: AutowrapOptions) -> Self {
        Autowrap {
            typ,
            operand,
            options,
        }
    }

    pub fn operand(&self) -> &Relation {
        &self.operand
    }

    pub fn options(&self) -> &AutowrapOptions {
        &self.options
    }

    /// Roots this node folds attributes into, from the operand's
    /// attrlist. `None` when the operand's attributes are unknown.
    fn roots(&self) -> Option<AttrList> {
        self.operand
            .typ()
            .attrlist()
            .map(|attrs| wrapped_roots(attrs, self.options.split()))
    }
}

impl RelOp for Autowrap {
    fn tag(&self) -> &'static str {
        "autowrap"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        let options = &self.options;
        Box::new(
            self.operand
                .tuples()
                .map(move |t| t.map(|tuple| autowrap_tuple(&tuple, options))),
        )
    }

    fn ast(&self) -> Ast {
        let params = serde_json::to_value(&self.options).unwrap_or(Ast::Null);
        ast::unary(self.tag(), self.operand.ast(), params)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    /// Wrapping twice with one configuration is wrapping once.
    fn opt_autowrap(
        &self,
        this: &Relation,
        _typ: &RelType,
        options: &AutowrapOptions,
    ) -> Option<Relation> {
        if self.options.same_options(options) {
            Some(this.clone())
        } else {
            None
        }
    }

    /// Restriction slides below the wrap when it reads no wrapped root,
    /// which needs the operand's attrlist to be known.
    fn opt_restrict(
        &self,
        _this: &Relation,
        _typ: &RelType,
        predicate: &Predicate,
    ) -> Option<Relation> {
        let roots = self.roots()?;
        if roots.is_disjoint(&predicate.free_variables()) {
            Some(
                self.operand
                    .restrict(predicate.clone())
                    .autowrap(self.options.clone()),
            )
        } else {
            None
        }
    }

    /// Paging slides below the wrap when the ordering reads no wrapped
    /// root, under the same attrlist-knowledge guard.
    fn opt_page(
        &self,
        _this: &Relation,
        _typ: &RelType,
        ordering: &OrderBy,
        page_index: usize,
        options: &PageOptions,
    ) -> Option<Relation> {
        let roots = self.roots()?;
        if roots.is_disjoint(&ordering.attrs()) {
            Some(
                self.operand
                    .page(ordering.clone(), page_index, *options)
                    .autowrap(self.options.clone()),
            )
        } else {
            None
        }
    }
}

/// Wraps one tuple: each attribute is split on the token and assigned at
/// the nested path, earlier split segments becoming nested tuples; then
/// the postprocessor clears all-nil noise.
fn autowrap_tuple(tuple: &Tuple, options: &AutowrapOptions) -> Tuple {
    // The split token is non-empty by construction.
    let split = options.split();
    let mut wrapped = Tuple::new();
    for (attr, value) in tuple.iter() {
        let parts: Vec<&str> = attr.split(split).collect();
        assign_path(&mut wrapped, &parts, value.clone());
    }
    postprocess(&mut wrapped, options.postprocessor());
    wrapped
}

fn assign_path(into: &mut Tuple, parts: &[&str], value: Value) {
    if parts.len() == 1 {
        into.insert(parts[0], value);
        return;
    }
    let head = parts[0];
    let mut nested = match into.remove(head) {
        Some(Value::Tuple(t)) => t,
        _ => Tuple::new(),
    };
    assign_path(&mut nested, &parts[1..], value);
    into.insert(head, Value::Tuple(nested));
}

/// A nested tuple is noise when every leaf under it is null. The empty
/// nested tuple counts as noise.
fn all_nil(tuple: &Tuple) -> bool {
    tuple.iter().all(|(_, v)| match v.as_tuple() {
        Some(nested) => all_nil(nested),
        None => v.is_null(),
    })
}

fn postprocess(tuple: &mut Tuple, postprocessor: &Postprocessor) {
    if matches!(postprocessor, Postprocessor::None) {
        return;
    }
    let noisy: Vec<String> = tuple
        .iter()
        .filter_map(|(k, v)| match v {
            Value::Tuple(nested) if all_nil(nested) => Some(k.to_string()),
            _ => None,
        })
        .collect();
    for attr in noisy {
        match postprocessor {
            Postprocessor::None => {}
            Postprocessor::Nil => {
                tuple.insert(attr, Value::Null);
            }
            Postprocessor::Delete => {
                tuple.remove(&attr);
            }
            Postprocessor::PerAttribute(map) => {
                match map.get(&attr).copied().unwrap_or(Remover::None) {
                    Remover::None => {}
                    Remover::Nil => {
                        tuple.insert(attr, Value::Null);
                    }
                    Remover::Delete => {
                        tuple.remove(&attr);
                    }
                }
            }
            Postprocessor::Custom(f) => f(tuple, &attr),
        }
    }
}
