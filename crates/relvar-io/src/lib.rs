#![forbid(unsafe_code)]
//! relvar-io: leaf readers at the engine boundary.
//!
//! Readers implement the full relation protocol; their failures are
//! mapped into the core error before entering a tuple stream.

pub mod csv;
pub mod error;

pub use crate::csv::{Csv, CsvSource};
pub use crate::error::ReaderError;
