//! Allbut: removes the named attributes.

use std::any::Any;

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;
use relvar_core::{AttrList, Predicate};

use crate::options::PageOptions;
use crate::page::OrderBy;
use crate::relation::{RelOp, Relation, Tuples};

pub struct Allbut {
    typ: RelType,
    operand: Relation,
    butlist: AttrList,
}

impl Allbut {
    pub fn new(typ: RelType, operand: Relation, butlist: AttrList) -> Self {
        Allbut {
            typ,
            operand,
            butlist,
        }
    }

    pub fn operand(&self) -> &Relation {
        &self.operand
    }

    pub fn butlist(&self) -> &AttrList {
        &self.butlist
    }
}

impl RelOp for Allbut {
    fn tag(&self) -> &'static str {
        "allbut"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        let butlist = &self.butlist;
        Box::new(
            self.operand
                .tuples()
                .map(move |t| t.map(|tuple| tuple.allbut(butlist))),
        )
    }

    fn ast(&self) -> Ast {
        ast::unary(
            self.tag(),
            self.operand.ast(),
            ast::attrs_ast(&self.butlist),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    /// Restriction slides below when it never reads a removed attribute.
    fn opt_restrict(
        &self,
        _this: &Relation,
        _typ: &RelType,
        predicate: &Predicate,
    ) -> Option<Relation> {
        if predicate.free_variables().is_disjoint(&self.butlist) {
            Some(
                self.operand
                    .restrict(predicate.clone())
                    .allbut(self.butlist.clone()),
            )
        } else {
            None
        }
    }

    /// Two stacked removals fuse into one, butlists unioned in insertion
    /// order, disjoint or not.
    fn opt_allbut(
        &self,
        _this: &Relation,
        _typ: &RelType,
        butlist: &AttrList,
    ) -> Option<Relation> {
        Some(self.operand.allbut(self.butlist.union_with(butlist)))
    }

    /// Paging slides below only when provably safe: the removal keeps a
    /// candidate key (so it cannot merge duplicates and shift page
    /// boundaries) and the ordering never reads a removed attribute.
    fn opt_page(
        &self,
        _this: &Relation,
        _typ: &RelType,
        ordering: &OrderBy,
        page_index: usize,
        options: &PageOptions,
    ) -> Option<Relation> {
        let keeps_a_key = self
            .operand
            .typ()
            .keys()
            .is_some_and(|ks| ks.any_disjoint_from(&self.butlist));
        let ordering_survives = ordering.attrs().is_disjoint(&self.butlist);
        if keeps_a_key && ordering_survives {
            Some(
                self.operand
                    .page(ordering.clone(), page_index, *options)
                    .allbut(self.butlist.clone()),
            )
        } else {
            None
        }
    }
}
