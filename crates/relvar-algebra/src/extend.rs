//! Extend: adds computed attributes.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;
use relvar_core::tuple::Value;
use relvar_core::{AttrList, Result, Tuple};

use crate::relation::{RelOp, Relation, Tuples};

/// One computed attribute: evaluated against each operand tuple.
pub type Extension = Arc<dyn Fn(&Tuple) -> Result<Value> + Send + Sync>;

/// Named extensions, applied in insertion order so later ones can read
/// earlier results.
#[derive(Clone, Default)]
pub struct Extensions {
    items: Vec<(String, Extension)>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        attr: impl Into<String>,
        f: impl Fn(&Tuple) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.items.push((attr.into(), Arc::new(f)));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Extension)> {
        self.items.iter().map(|(a, f)| (a.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The attribute names being added, in insertion order.
    pub fn attrs(&self) -> AttrList {
        self.items.iter().map(|(a, _)| a.as_str()).collect()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.items.iter().map(|(a, _)| a))
            .finish()
    }
}

pub struct Extend {
    typ: RelType,
    operand: Relation,
    extensions: Extensions,
}

impl Extend {
    pub fn new(typ: RelType, operand: Relation, extensions: Extensions) -> Self {
        Extend {
            typ,
            operand,
            extensions,
        }
    }

    pub fn operand(&self) -> &Relation {
        &self.operand
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl RelOp for Extend {
    fn tag(&self) -> &'static str {
        "extend"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        let extensions = &self.extensions;
        Box::new(self.operand.tuples().map(move |t| -> Result<Tuple> {
            let base = t?;
            // Each extension sees the base merged with everything computed
            // before it.
            let mut computed = Tuple::new();
            for (attr, f) in extensions.iter() {
                let value = f(&base.merged(&computed))?;
                computed.insert(attr, value);
            }
            Ok(base.merged(&computed))
        }))
    }

    fn ast(&self) -> Ast {
        // Closures have no canonical form; identify them by address so
        // two distinct extensions never compare structurally equal.
        let params = Ast::Object(
            self.extensions
                .iter()
                .map(|(a, f)| {
                    (
                        a.to_string(),
                        Ast::String(format!("fn:{:p}", Arc::as_ptr(f).cast::<()>())),
                    )
                })
                .collect(),
        );
        ast::unary(self.tag(), self.operand.ast(), params)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
