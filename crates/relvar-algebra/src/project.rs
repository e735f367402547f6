//! Projection: keeps only the named attributes.
//!
//! Bag semantics: tuples made identical by the projection are all kept.
//! Deduplication is the caller's call, not a hidden cost here.

use std::any::Any;

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;
use relvar_core::{AttrList, Predicate};

use crate::relation::{RelOp, Relation, Tuples};

pub struct Project {
    typ: RelType,
    operand: Relation,
    attrs: AttrList,
}

impl Project {
    pub fn new(typ: RelType, operand: Relation, attrs: AttrList) -> Self {
        Project {
            typ,
            operand,
            attrs,
        }
    }

    pub fn operand(&self) -> &Relation {
        &self.operand
    }

    pub fn attrs(&self) -> &AttrList {
        &self.attrs
    }
}

impl RelOp for Project {
    fn tag(&self) -> &'static str {
        "project"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        let attrs = &self.attrs;
        Box::new(
            self.operand
                .tuples()
                .map(move |t| t.map(|tuple| tuple.project(attrs))),
        )
    }

    fn ast(&self) -> Ast {
        ast::unary(self.tag(), self.operand.ast(), ast::attrs_ast(&self.attrs))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    /// Restriction slides below the projection when it only reads
    /// attributes that survive it.
    fn opt_restrict(
        &self,
        _this: &Relation,
        _typ: &RelType,
        predicate: &Predicate,
    ) -> Option<Relation> {
        if predicate.free_variables().is_subset_of(&self.attrs) {
            Some(
                self.operand
                    .restrict(predicate.clone())
                    .project(self.attrs.clone()),
            )
        } else {
            None
        }
    }

    /// Removing attributes from a projection is a narrower projection.
    fn opt_allbut(
        &self,
        _this: &Relation,
        _typ: &RelType,
        butlist: &AttrList,
    ) -> Option<Relation> {
        Some(self.operand.project(self.attrs.minus(butlist)))
    }
}
