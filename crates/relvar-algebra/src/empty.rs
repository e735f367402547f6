//! The empty relation of a given type.
//!
//! Exists mostly for optimization: knowing a relation is empty absorbs
//! most operations outright.

use std::any::Any;

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;
use relvar_core::{AttrList, Predicate, Result};

use crate::extend::Extensions;
use crate::options::{AutowrapOptions, UnionOptions};
use crate::relation::{RelOp, Relation, Tuples};
use crate::rename::Renaming;

pub struct Empty {
    typ: RelType,
}

impl Empty {
    pub fn new(typ: RelType) -> Self {
        Empty { typ }
    }
}

impl RelOp for Empty {
    fn tag(&self) -> &'static str {
        "empty"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        Box::new(std::iter::empty())
    }

    fn count(&self) -> Result<usize> {
        Ok(0)
    }

    fn ast(&self) -> Ast {
        ast::leaf(self.tag())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    // Absorption: transforming nothing yields nothing, at the transformed
    // type. Restriction keeps the node as-is; union yields the other side.

    fn opt_restrict(
        &self,
        this: &Relation,
        _typ: &RelType,
        _predicate: &Predicate,
    ) -> Option<Relation> {
        Some(this.clone())
    }

    fn opt_project(&self, _this: &Relation, typ: &RelType, _attrs: &AttrList) -> Option<Relation> {
        Some(Relation::empty(typ.clone()))
    }

    fn opt_allbut(
        &self,
        _this: &Relation,
        typ: &RelType,
        _butlist: &AttrList,
    ) -> Option<Relation> {
        Some(Relation::empty(typ.clone()))
    }

    fn opt_union(
        &self,
        _this: &Relation,
        _typ: &RelType,
        other: &Relation,
        _options: &UnionOptions,
    ) -> Option<Relation> {
        Some(other.clone())
    }

    fn opt_autowrap(
        &self,
        _this: &Relation,
        typ: &RelType,
        _options: &AutowrapOptions,
    ) -> Option<Relation> {
        Some(Relation::empty(typ.clone()))
    }

    fn opt_rename(
        &self,
        _this: &Relation,
        typ: &RelType,
        _renaming: &Renaming,
    ) -> Option<Relation> {
        Some(Relation::empty(typ.clone()))
    }

    fn opt_extend(
        &self,
        _this: &Relation,
        typ: &RelType,
        _extensions: &Extensions,
    ) -> Option<Relation> {
        Some(Relation::empty(typ.clone()))
    }
}
