//! Rename: rewrites attribute names per an old → new mapping.

use std::any::Any;
use std::collections::BTreeMap;

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;

use crate::relation::{RelOp, Relation, Tuples};

/// Old name → new name; unmapped attributes pass through.
pub type Renaming = BTreeMap<String, String>;

/// Builds a [`Renaming`] from pairs.
pub fn renaming<K, V, I>(pairs: I) -> Renaming
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

pub struct Rename {
    typ: RelType,
    operand: Relation,
    renaming: Renaming,
}

impl Rename {
    pub fn new(typ: RelType, operand: Relation, renaming: Renaming) -> Self {
        Rename {
            typ,
            operand,
            renaming,
        }
    }

    pub fn operand(&self) -> &Relation {
        &self.operand
    }

    pub fn renaming(&self) -> &Renaming {
        &self.renaming
    }
}

impl RelOp for Rename {
    fn tag(&self) -> &'static str {
        "rename"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        let renaming = &self.renaming;
        Box::new(
            self.operand
                .tuples()
                .map(move |t| t.map(|tuple| tuple.renamed(renaming))),
        )
    }

    fn ast(&self) -> Ast {
        let params = Ast::Object(
            self.renaming
                .iter()
                .map(|(k, v)| (k.clone(), Ast::String(v.clone())))
                .collect(),
        );
        ast::unary(self.tag(), self.operand.ast(), params)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
