//! The relation protocol: an object-safe node trait plus a cloneable
//! handle implementing the uniform construction-time dispatch.
//!
//! Every algebra method on [`Relation`] follows the same shape:
//!
//! 1. compute the resulting [`RelType`] from the operand type and the
//!    arguments (pure);
//! 2. offer the operand node its optimization hook;
//! 3. on `None`, build the generic operator node.
//!
//! Hooks are semantics-preserving: a rewritten tree must produce the same
//! tuple stream as the generic one, for every operand stream.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use relvar_core::ast::Ast;
use relvar_core::hash::{hash_serde, Hash256};
use relvar_core::prelude::RelType;
use relvar_core::{AttrList, Predicate, Result, Tuple};

use crate::allbut::Allbut;
use crate::autowrap::Autowrap;
use crate::empty::Empty;
use crate::extend::{Extend, Extensions};
use crate::matching::Matching;
use crate::memory::Memory;
use crate::options::{AutowrapOptions, PageOptions, UnionOptions};
use crate::page::{OrderBy, Page};
use crate::project::Project;
use crate::rename::{Rename, Renaming};
use crate::restrict::Restrict;
use crate::spied::{Spied, Spy};
use crate::trace;
use crate::union::Union;

/// A fresh, lazy tuple stream; every call restarts from the leaves.
pub type Tuples<'a> = Box<dyn Iterator<Item = Result<Tuple>> + 'a>;

/// One relation node: a leaf or an operator over operand handles.
///
/// The `opt_*` methods are the optimization hooks, one per algebra
/// operation. `this` is the handle wrapping this very node and `typ` the
/// already-computed result type; returning `None` (every default) lets
/// the dispatcher build the generic node instead.
pub trait RelOp: Send + Sync + 'static {
    /// AST tag; also names the node in trace events.
    fn tag(&self) -> &'static str;

    fn typ(&self) -> &RelType;

    fn tuples(&self) -> Tuples<'_>;

    /// Canonical `[tag, operand_ast…, params]` representation.
    fn ast(&self) -> Ast;

    fn as_any(&self) -> &dyn Any;

    /// Tuple count; the default drains the stream.
    fn count(&self) -> Result<usize> {
        let mut n = 0;
        for tuple in self.tuples() {
            tuple?;
            n += 1;
        }
        Ok(n)
    }

    /// The relation left once observers are stripped.
    fn unspied(&self, this: &Relation) -> Relation {
        this.clone()
    }

    fn opt_restrict(
        &self,
        _this: &Relation,
        _typ: &RelType,
        _predicate: &Predicate,
    ) -> Option<Relation> {
        None
    }

    fn opt_project(&self, _this: &Relation, _typ: &RelType, _attrs: &AttrList) -> Option<Relation> {
        None
    }

    fn opt_allbut(
        &self,
        _this: &Relation,
        _typ: &RelType,
        _butlist: &AttrList,
    ) -> Option<Relation> {
        None
    }

    fn opt_page(
        &self,
        _this: &Relation,
        _typ: &RelType,
        _ordering: &OrderBy,
        _page_index: usize,
        _options: &PageOptions,
    ) -> Option<Relation> {
        None
    }

    fn opt_union(
        &self,
        _this: &Relation,
        _typ: &RelType,
        _other: &Relation,
        _options: &UnionOptions,
    ) -> Option<Relation> {
        None
    }

    fn opt_autowrap(
        &self,
        _this: &Relation,
        _typ: &RelType,
        _options: &AutowrapOptions,
    ) -> Option<Relation> {
        None
    }

    fn opt_rename(
        &self,
        _this: &Relation,
        _typ: &RelType,
        _renaming: &Renaming,
    ) -> Option<Relation> {
        None
    }

    fn opt_extend(
        &self,
        _this: &Relation,
        _typ: &RelType,
        _extensions: &Extensions,
    ) -> Option<Relation> {
        None
    }

    fn opt_matching(&self, _this: &Relation, _typ: &RelType, _other: &Relation) -> Option<Relation> {
        None
    }
}

/// Cloneable handle over a shared immutable node. Cloning shares the
/// node, so operator trees are DAG-safe.
#[derive(Clone)]
pub struct Relation {
    node: Arc<dyn RelOp>,
}

impl Relation {
    pub fn new(node: impl RelOp) -> Self {
        Relation {
            node: Arc::new(node),
        }
    }

    /// The empty relation of the given type.
    pub fn empty(typ: RelType) -> Self {
        Relation::new(Empty::new(typ))
    }

    /// An in-memory leaf over owned tuples, of type `ANY`.
    pub fn memory(tuples: Vec<Tuple>) -> Self {
        Relation::new(Memory::new(tuples))
    }

    pub fn typ(&self) -> &RelType {
        self.node.typ()
    }

    /// A fresh lazy stream. Observation of `Spied` nodes happens here, at
    /// the handle, so observers see the exact handle being consumed.
    pub fn tuples(&self) -> Tuples<'_> {
        if let Some(spied) = self.downcast_ref::<Spied>() {
            return spied.observed_tuples(self);
        }
        self.node.tuples()
    }

    pub fn count(&self) -> Result<usize> {
        if let Some(spied) = self.downcast_ref::<Spied>() {
            return spied.observed_count(self);
        }
        self.node.count()
    }

    /// Drains the stream into a vector, stopping at the first error.
    pub fn to_vec(&self) -> Result<Vec<Tuple>> {
        self.tuples().collect()
    }

    pub fn ast(&self) -> Ast {
        self.node.ast()
    }

    /// Stable digest of the canonical AST.
    pub fn fingerprint(&self) -> Result<Hash256> {
        hash_serde(&self.ast())
    }

    /// Node identity (not structural equality).
    pub fn ptr_eq(&self, other: &Relation) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Borrows the underlying node as a concrete operator, for
    /// plan-shape inspection.
    pub fn downcast_ref<T: RelOp>(&self) -> Option<&T> {
        self.node.as_any().downcast_ref()
    }

    /// Strips observers, recursively.
    pub fn unspied(&self) -> Relation {
        self.node.unspied(self)
    }

    // ---- algebra ----

    /// Keeps tuples satisfying `predicate`. A tautology returns the
    /// receiver itself; a contradiction returns `Empty` of the same type.
    pub fn restrict(&self, predicate: Predicate) -> Relation {
        if predicate.tautology() {
            return self.clone();
        }
        if predicate.contradiction() {
            return Relation::empty(self.typ().clone());
        }
        let typ = self.typ().clone();
        match self.node.opt_restrict(self, &typ, &predicate) {
            Some(done) => self.rewritten("restrict", done),
            None => Relation::new(Restrict::new(typ, self.clone(), predicate)),
        }
    }

    /// Keeps only the named attributes.
    pub fn project(&self, attrs: impl Into<AttrList>) -> Relation {
        let attrs = attrs.into();
        let typ = self.typ().project(&attrs);
        match self.node.opt_project(self, &typ, &attrs) {
            Some(done) => self.rewritten("project", done),
            None => Relation::new(Project::new(typ, self.clone(), attrs)),
        }
    }

    /// Removes the named attributes. An empty butlist is the identity and
    /// returns the receiver itself.
    pub fn allbut(&self, butlist: impl Into<AttrList>) -> Relation {
        let butlist = butlist.into();
        if butlist.is_empty() {
            return self.clone();
        }
        let typ = self.typ().allbut(&butlist);
        match self.node.opt_allbut(self, &typ, &butlist) {
            Some(done) => self.rewritten("allbut", done),
            None => Relation::new(Allbut::new(typ, self.clone(), butlist)),
        }
    }

    /// One page of the relation sorted by `ordering`. Pages are
    /// one-based; page 0 and pages past the end are empty.
    pub fn page(&self, ordering: OrderBy, page_index: usize, options: PageOptions) -> Relation {
        let typ = self.typ().clone();
        match self
            .node
            .opt_page(self, &typ, &ordering, page_index, &options)
        {
            Some(done) => self.rewritten("page", done),
            None => Relation::new(Page::new(typ, self.clone(), ordering, page_index, options)),
        }
    }

    /// Set (or bag, per `options`) union. An `Empty` right operand is the
    /// identity and returns the receiver itself.
    pub fn union(&self, other: &Relation, options: UnionOptions) -> Relation {
        if other.downcast_ref::<Empty>().is_some() {
            return self.clone();
        }
        let typ = self.typ().union(other.typ());
        match self.node.opt_union(self, &typ, other, &options) {
            Some(done) => self.rewritten("union", done),
            None => Relation::new(Union::new(typ, self.clone(), other.clone(), options)),
        }
    }

    /// Wraps split-named attributes into nested tuples.
    pub fn autowrap(&self, options: AutowrapOptions) -> Relation {
        let typ = self.typ().autowrap(options.split());
        match self.node.opt_autowrap(self, &typ, &options) {
            Some(done) => self.rewritten("autowrap", done),
            None => Relation::new(Autowrap::new(typ, self.clone(), options)),
        }
    }

    /// Renames attributes per an old → new mapping.
    pub fn rename(&self, renaming: Renaming) -> Relation {
        let typ = self.typ().renamed(&renaming);
        match self.node.opt_rename(self, &typ, &renaming) {
            Some(done) => self.rewritten("rename", done),
            None => Relation::new(Rename::new(typ, self.clone(), renaming)),
        }
    }

    /// Adds computed attributes.
    pub fn extend(&self, extensions: Extensions) -> Relation {
        let typ = self.typ().extended(&extensions.attrs());
        match self.node.opt_extend(self, &typ, &extensions) {
            Some(done) => self.rewritten("extend", done),
            None => Relation::new(Extend::new(typ, self.clone(), extensions)),
        }
    }

    /// Semi-join: keeps tuples agreeing with `other` on their common
    /// attributes.
    pub fn matching(&self, other: &Relation) -> Relation {
        let typ = self.typ().clone();
        match self.node.opt_matching(self, &typ, other) {
            Some(done) => self.rewritten("matching", done),
            None => Relation::new(Matching::new(typ, self.clone(), other.clone())),
        }
    }

    /// Attaches an observer notified on every terminal consumption.
    pub fn spied(&self, spy: Arc<dyn Spy>) -> Relation {
        Relation::new(Spied::new(self.clone(), spy))
    }

    fn rewritten(&self, operation: &'static str, done: Relation) -> Relation {
        trace::rewrite_applied(operation, self.node.tag());
        done
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relation({})", self.ast())
    }
}
