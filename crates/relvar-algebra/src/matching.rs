//! Matching (semi-join): keeps left tuples that agree with at least one
//! right tuple on their common attributes.

use std::any::Any;

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;
use relvar_core::AttrList;

use crate::relation::{RelOp, Relation, Tuples};

pub struct Matching {
    typ: RelType,
    left: Relation,
    right: Relation,
}

impl Matching {
    pub fn new(typ: RelType, left: Relation, right: Relation) -> Self {
        Matching { typ, left, right }
    }

    pub fn left(&self) -> &Relation {
        &self.left
    }

    pub fn right(&self) -> &Relation {
        &self.right
    }
}

impl RelOp for Matching {
    fn tag(&self) -> &'static str {
        "matching"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        let right = match self.right.to_vec() {
            Ok(tuples) => tuples,
            Err(e) => return Box::new(std::iter::once(Err(e))),
        };
        // Common attributes come from the types when both are known,
        // otherwise from the headings met at iteration time.
        let declared = match (self.left.typ().attrlist(), self.right.typ().attrlist()) {
            (Some(l), Some(r)) => Some(l.intersect(r)),
            _ => None,
        };
        Box::new(self.left.tuples().filter_map(move |t| match t {
            Ok(left_tuple) => {
                let common = match &declared {
                    Some(c) => c.clone(),
                    None => right
                        .first()
                        .map(|rt| left_tuple.heading().intersect(&rt.heading()))
                        .unwrap_or_else(AttrList::new),
                };
                let hit = right
                    .iter()
                    .any(|rt| common.iter().all(|a| left_tuple.get(a) == rt.get(a)));
                if hit {
                    Some(Ok(left_tuple))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e)),
        }))
    }

    fn ast(&self) -> Ast {
        ast::binary(self.tag(), self.left.ast(), self.right.ast(), Ast::Null)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
