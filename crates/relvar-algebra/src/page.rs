//! Page: one slice of the relation under a total ordering.
//!
//! Pages are one-based; page 0 and pages past the end yield no tuples.
//! Sorting is stable, so ties keep their operand order and a tuple never
//! jumps pages between traversals of the same tree.

use std::any::Any;
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use relvar_core::ast::{self, Ast};
use relvar_core::prelude::RelType;
use relvar_core::tuple::Value;
use relvar_core::{AttrList, Tuple};

use crate::options::PageOptions;
use crate::relation::{RelOp, Relation, Tuples};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// Ordering specification: attributes with directions, significant first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct OrderBy(Vec<(String, Direction)>);

impl OrderBy {
    pub fn new<S: Into<String>>(pairs: impl IntoIterator<Item = (S, Direction)>) -> Self {
        OrderBy(pairs.into_iter().map(|(a, d)| (a.into(), d)).collect())
    }

    pub fn asc(attr: impl Into<String>) -> Self {
        OrderBy(vec![(attr.into(), Direction::Asc)])
    }

    pub fn desc(attr: impl Into<String>) -> Self {
        OrderBy(vec![(attr.into(), Direction::Desc)])
    }

    pub fn then_asc(mut self, attr: impl Into<String>) -> Self {
        self.0.push((attr.into(), Direction::Asc));
        self
    }

    pub fn then_desc(mut self, attr: impl Into<String>) -> Self {
        self.0.push((attr.into(), Direction::Desc));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.0.iter().map(|(a, d)| (a.as_str(), *d))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The attributes the ordering reads.
    pub fn attrs(&self) -> AttrList {
        self.0.iter().map(|(a, _)| a.as_str()).collect()
    }

    /// Compares two tuples under this ordering; attributes a tuple lacks
    /// sort as nulls.
    pub fn compare(&self, a: &Tuple, b: &Tuple) -> Ordering {
        static NULL: Value = Value::Null;
        for (attr, direction) in self.iter() {
            let va = a.get(attr).unwrap_or(&NULL);
            let vb = b.get(attr).unwrap_or(&NULL);
            let ord = match direction {
                Direction::Asc => va.cmp(vb),
                Direction::Desc => va.cmp(vb).reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

pub struct Page {
    typ: RelType,
    operand: Relation,
    ordering: OrderBy,
    page_index: usize,
    options: PageOptions,
}

impl Page {
    pub fn new(
        typ: RelType,
        operand: Relation,
        ordering: OrderBy,
        page_index: usize,
        options: PageOptions,
    ) -> Self {
        Page {
            typ,
            operand,
            ordering,
            page_index,
            options,
        }
    }

    pub fn operand(&self) -> &Relation {
        &self.operand
    }

    pub fn ordering(&self) -> &OrderBy {
        &self.ordering
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn options(&self) -> &PageOptions {
        &self.options
    }
}

impl RelOp for Page {
    fn tag(&self) -> &'static str {
        "page"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        if self.page_index == 0 {
            return Box::new(std::iter::empty());
        }
        let mut all = match self.operand.to_vec() {
            Ok(tuples) => tuples,
            Err(e) => return Box::new(std::iter::once(Err(e))),
        };
        all.sort_by(|a, b| self.ordering.compare(a, b));
        let size = self.options.page_size();
        let start = (self.page_index - 1).saturating_mul(size);
        Box::new(all.into_iter().skip(start).take(size).map(Ok))
    }

    fn ast(&self) -> Ast {
        ast::unary(
            self.tag(),
            self.operand.ast(),
            serde_json::json!({
                "ordering": self.ordering,
                "page_index": self.page_index,
                "options": self.options,
            }),
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
