//! In-memory leaf relation over owned tuples.

use std::any::Any;

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;
use relvar_core::{Result, Tuple};

use crate::relation::{RelOp, Tuples};

pub struct Memory {
    typ: RelType,
    tuples: Vec<Tuple>,
}

impl Memory {
    /// A leaf of type `ANY`; attach knowledge with [`Memory::with_type`].
    pub fn new(tuples: Vec<Tuple>) -> Self {
        Memory {
            typ: RelType::ANY,
            tuples,
        }
    }

    /// Replaces the declared type knowledge.
    pub fn with_type(mut self, typ: RelType) -> Self {
        self.typ = typ;
        self
    }
}

impl RelOp for Memory {
    fn tag(&self) -> &'static str {
        "memory"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        Box::new(self.tuples.iter().cloned().map(Ok))
    }

    fn count(&self) -> Result<usize> {
        Ok(self.tuples.len())
    }

    fn ast(&self) -> Ast {
        let params = Ast::Array(self.tuples.iter().map(ast::tuple_ast).collect());
        ast::leaf_with(self.tag(), params)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
