#![forbid(unsafe_code)]
//! relvar-core: tuples, values, attribute/type knowledge, predicates, the
//! canonical AST, and stable hashing for the relvar engine.
//!
//! Design intent:
//! - Pure data, no I/O, no operators; the algebra crate builds on this.
//! - Everything here is an immutable value with structural equality.

pub mod ast;
pub mod error;
pub mod hash;
pub mod predicate;
pub mod prelude;
pub mod schema;
pub mod tuple;

pub use error::{Error, Result};
pub use predicate::Predicate;
pub use schema::{AttrList, Keys, RelType};
pub use tuple::{Tuple, Value};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
