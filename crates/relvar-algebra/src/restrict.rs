//! Restriction: keeps the tuples satisfying a predicate.

use std::any::Any;

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;
use relvar_core::Predicate;

use crate::relation::{RelOp, Relation, Tuples};

pub struct Restrict {
    typ: RelType,
    operand: Relation,
    predicate: Predicate,
}

impl Restrict {
    pub fn new(typ: RelType, operand: Relation, predicate: Predicate) -> Self {
        Restrict {
            typ,
            operand,
            predicate,
        }
    }

    pub fn operand(&self) -> &Relation {
        &self.operand
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl RelOp for Restrict {
    fn tag(&self) -> &'static str {
        "restrict"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        let predicate = &self.predicate;
        Box::new(self.operand.tuples().filter_map(move |t| match t {
            Ok(tuple) => match predicate.eval(&tuple) {
                Ok(true) => Some(Ok(tuple)),
                Ok(false) => None,
                Err(e) => Some(Err(e)),
            },
            Err(e) => Some(Err(e)),
        }))
    }

    fn ast(&self) -> Ast {
        ast::unary(
            self.tag(),
            self.operand.ast(),
            ast::predicate_ast(&self.predicate),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    /// Two stacked restrictions fuse into one conjunction on the original
    /// operand, avoiding a double pass.
    fn opt_restrict(
        &self,
        _this: &Relation,
        _typ: &RelType,
        predicate: &Predicate,
    ) -> Option<Relation> {
        Some(
            self.operand
                .restrict(self.predicate.clone().and(predicate.clone())),
        )
    }
}
