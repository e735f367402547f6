//! Union: left tuples then right tuples.
//!
//! The default removes duplicates across both operands with an ordered
//! seen-set; `all = true` keeps the bag and stays fully lazy.

use std::any::Any;
use std::collections::BTreeSet;

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;

use crate::options::UnionOptions;
use crate::relation::{RelOp, Relation, Tuples};

pub struct Union {
    typ: RelType,
    left: Relation,
    right: Relation,
    options: UnionOptions,
}

impl Union {
    pub fn new(typ: RelType, left: Relation, right: Relation, options: UnionOptions) -> Self {
        Union {
            typ,
            left,
            right,
            options,
        }
    }

    pub fn left(&self) -> &Relation {
        &self.left
    }

    pub fn right(&self) -> &Relation {
        &self.right
    }

    pub fn options(&self) -> &UnionOptions {
        &self.options
    }
}

impl RelOp for Union {
    fn tag(&self) -> &'static str {
        "union"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        let chained = self.left.tuples().chain(self.right.tuples());
        if self.options.all() {
            return Box::new(chained);
        }
        let mut seen = BTreeSet::new();
        Box::new(chained.filter_map(move |t| match t {
            Ok(tuple) => seen.insert(tuple.clone()).then_some(Ok(tuple)),
            Err(e) => Some(Err(e)),
        }))
    }

    fn ast(&self) -> Ast {
        ast::binary(
            self.tag(),
            self.left.ast(),
            self.right.ast(),
            serde_json::json!({ "all": self.options.all() }),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
