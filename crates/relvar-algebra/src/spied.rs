//! Spied: decorates a relation with a consumption observer.
//!
//! Algebra methods forward to the operand and rewrap, so the spy follows
//! the tip of the tree; right operands of binary operations are unspied
//! on the way in. Observation itself is driven by the [`Relation`]
//! handle, so the observer sees the exact handle being consumed, exactly
//! once per `tuples()`/`count()` call.

use std::any::Any;
use std::sync::Arc;

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;
use relvar_core::{AttrList, Error, Predicate, Result, Tuple};

use crate::extend::Extensions;
use crate::options::{AutowrapOptions, PageOptions, UnionOptions};
use crate::page::OrderBy;
use crate::relation::{RelOp, Relation, Tuples};
use crate::rename::Renaming;

/// A consumption observer.
///
/// Plain spies are notified via [`Spy::observe`] and the stream stays
/// lazy. A spy reporting `measures() == true` instead wraps the terminal
/// work in [`Spy::measure`]; the enumeration is buffered so it runs
/// entirely inside the measurement.
pub trait Spy: Send + Sync + 'static {
    fn observe(&self, relation: &Relation);

    fn measures(&self) -> bool {
        false
    }

    fn measure(&self, relation: &Relation, work: &mut dyn FnMut()) {
        self.observe(relation);
        work();
    }
}

impl<F> Spy for F
where
    F: Fn(&Relation) + Send + Sync + 'static,
{
    fn observe(&self, relation: &Relation) {
        self(relation)
    }
}

pub struct Spied {
    operand: Relation,
    spy: Arc<dyn Spy>,
}

impl Spied {
    pub fn new(operand: Relation, spy: Arc<dyn Spy>) -> Self {
        Spied { operand, spy }
    }

    pub fn operand(&self) -> &Relation {
        &self.operand
    }

    pub fn spy(&self) -> &Arc<dyn Spy> {
        &self.spy
    }

    fn rewrap(&self, relation: Relation) -> Relation {
        relation.spied(self.spy.clone())
    }

    pub(crate) fn observed_tuples(&self, this: &Relation) -> Tuples<'_> {
        if !self.spy.measures() {
            self.spy.observe(this);
            return self.operand.tuples();
        }
        let mut buffered: Option<Result<Vec<Tuple>>> = None;
        self.spy
            .measure(this, &mut || buffered = Some(self.operand.to_vec()));
        match buffered {
            Some(Ok(tuples)) => Box::new(tuples.into_iter().map(Ok)),
            Some(Err(e)) => Box::new(std::iter::once(Err(e))),
            None => Box::new(std::iter::once(Err(missing_work_call()))),
        }
    }

    pub(crate) fn observed_count(&self, this: &Relation) -> Result<usize> {
        if !self.spy.measures() {
            self.spy.observe(this);
            return self.operand.count();
        }
        let mut counted: Option<Result<usize>> = None;
        self.spy
            .measure(this, &mut || counted = Some(self.operand.count()));
        counted.unwrap_or_else(|| Err(missing_work_call()))
    }
}

fn missing_work_call() -> Error {
    Error::Invariant("measuring spy never ran the work closure".to_string())
}

impl RelOp for Spied {
    fn tag(&self) -> &'static str {
        "spied"
    }

    fn typ(&self) -> &RelType {
        self.operand.typ()
    }

    // Direct node access forwards without observing; consumption always
    // goes through the handle, which observes.
    fn tuples(&self) -> Tuples<'_> {
        self.operand.tuples()
    }

    fn count(&self) -> Result<usize> {
        self.operand.count()
    }

    fn ast(&self) -> Ast {
        let params = Ast::String(format!("spy:{:p}", Arc::as_ptr(&self.spy).cast::<()>()));
        ast::unary(self.tag(), self.operand.ast(), params)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn unspied(&self, _this: &Relation) -> Relation {
        self.operand.unspied()
    }

    // Forwarding: apply to the operand, rewrap, unspy right operands.

    fn opt_restrict(
        &self,
        _this: &Relation,
        _typ: &RelType,
        predicate: &Predicate,
    ) -> Option<Relation> {
        Some(self.rewrap(self.operand.restrict(predicate.clone())))
    }

    fn opt_project(&self, _this: &Relation, _typ: &RelType, attrs: &AttrList) -> Option<Relation> {
        Some(self.rewrap(self.operand.project(attrs.clone())))
    }

    fn opt_allbut(
        &self,
        _this: &Relation,
        _typ: &RelType,
        butlist: &AttrList,
    ) -> Option<Relation> {
        Some(self.rewrap(self.operand.allbut(butlist.clone())))
    }

    fn opt_page(
        &self,
        _this: &Relation,
        _typ: &RelType,
        ordering: &OrderBy,
        page_index: usize,
        options: &PageOptions,
    ) -> Option<Relation> {
        Some(self.rewrap(self.operand.page(ordering.clone(), page_index, *options)))
    }

    fn opt_union(
        &self,
        _this: &Relation,
        _typ: &RelType,
        other: &Relation,
        options: &UnionOptions,
    ) -> Option<Relation> {
        Some(self.rewrap(self.operand.union(&other.unspied(), *options)))
    }

    fn opt_autowrap(
        &self,
        _this: &Relation,
        _typ: &RelType,
        options: &AutowrapOptions,
    ) -> Option<Relation> {
        Some(self.rewrap(self.operand.autowrap(options.clone())))
    }

    fn opt_rename(
        &self,
        _this: &Relation,
        _typ: &RelType,
        renaming: &Renaming,
    ) -> Option<Relation> {
        Some(self.rewrap(self.operand.rename(renaming.clone())))
    }

    fn opt_extend(
        &self,
        _this: &Relation,
        _typ: &RelType,
        extensions: &Extensions,
    ) -> Option<Relation> {
        Some(self.rewrap(self.operand.extend(extensions.clone())))
    }

    fn opt_matching(&self, _this: &Relation, _typ: &RelType, other: &Relation) -> Option<Relation> {
        Some(self.rewrap(self.operand.matching(&other.unspied())))
    }
}
