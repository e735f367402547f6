#![forbid(unsafe_code)]
//! relvar-algebra: the relation protocol and its self-optimizing operators.
//!
//! Design intent:
//! - Relations are immutable operator trees behind cloneable handles;
//!   optimization happens once, at construction, via per-node hooks.
//! - Evaluation is pull-based and lazy; nothing here does I/O.
//! - Rewrites must be provable from node structure plus type knowledge,
//!   and decline (`None`) otherwise.

pub mod allbut;
pub mod autowrap;
pub mod empty;
pub mod extend;
pub mod matching;
pub mod memory;
pub mod options;
pub mod page;
pub mod project;
pub mod relation;
pub mod rename;
pub mod restrict;
pub mod spied;
pub mod trace;
pub mod union;

pub use allbut::Allbut;
pub use autowrap::Autowrap;
pub use empty::Empty;
pub use extend::{Extend, Extension, Extensions};
pub use matching::Matching;
pub use memory::Memory;
pub use options::{AutowrapOptions, CustomPostprocessor, PageOptions, Postprocessor, Remover, UnionOptions};
pub use page::{Direction, OrderBy, Page};
pub use project::Project;
pub use relation::{RelOp, Relation, Tuples};
pub use rename::{renaming, Rename, Renaming};
pub use restrict::Restrict;
pub use spied::{Spied, Spy};
pub use union::Union;
