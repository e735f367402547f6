//! Convenient re-exports for downstream crates.

pub use crate::ast::Ast;
pub use crate::error::{Error, Result};
pub use crate::hash::{hash_serde, Hash256};
pub use crate::predicate::Predicate;
pub use crate::schema::{AttrList, Keys, RelType};
pub use crate::tuple::{Tuple, Value};
