#![forbid(unsafe_code)]
//! relvar: lazily-evaluated, self-optimizing relational algebra.
//!
//! Facade over the workspace crates: the core data model
//! (`relvar-core`), the relation protocol and operators
//! (`relvar-algebra`), and leaf readers (`relvar-io`).

pub use relvar_core::ast::Ast;
pub use relvar_core::hash::Hash256;
pub use relvar_core::tuple;
pub use relvar_core::{AttrList, Error, Keys, Predicate, RelType, Result, Tuple, Value};

pub use relvar_algebra::{
    renaming, Allbut, Autowrap, AutowrapOptions, CustomPostprocessor, Direction, Empty, Extend,
    Extension, Extensions, Matching, Memory, OrderBy, Page, PageOptions, Postprocessor, Project,
    RelOp, Relation, Remover, Rename, Renaming, Restrict, Spied, Spy, Tuples, Union, UnionOptions,
};

pub use relvar_io::{Csv, CsvSource, ReaderError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
