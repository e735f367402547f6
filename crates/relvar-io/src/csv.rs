//! CSV leaf relation.
//!
//! The header row names the attributes; fields surface as raw strings,
//! never coerced. Every traversal re-reads the source, so the stream is
//! restartable like any other relation.

use std::any::Any;
use std::io::Read;
use std::path::PathBuf;

use relvar_algebra::relation::{RelOp, Tuples};
use relvar_core::ast::{self, Ast};
use relvar_core::hash::hash_bytes;
use relvar_core::prelude::RelType;
use relvar_core::{Result, Tuple};

use crate::error::ReaderError;

/// Where the CSV text lives. Raw streams cannot be rewound, so sources
/// are things that can be reopened.
#[derive(Debug, Clone)]
pub enum CsvSource {
    Path(PathBuf),
    Data(String),
}

pub struct Csv {
    typ: RelType,
    source: CsvSource,
}

impl Csv {
    pub fn new(typ: RelType, source: CsvSource) -> Self {
        Csv { typ, source }
    }

    pub fn from_path(typ: RelType, path: impl Into<PathBuf>) -> Self {
        Csv::new(typ, CsvSource::Path(path.into()))
    }

    pub fn from_data(typ: RelType, data: impl Into<String>) -> Self {
        Csv::new(typ, CsvSource::Data(data.into()))
    }

    pub fn source(&self) -> &CsvSource {
        &self.source
    }
}

impl RelOp for Csv {
    fn tag(&self) -> &'static str {
        "csv"
    }

    fn typ(&self) -> &RelType {
        &self.typ
    }

    fn tuples(&self) -> Tuples<'_> {
        match &self.source {
            CsvSource::Path(path) => match csv::Reader::from_path(path) {
                Ok(reader) => tuple_stream(reader),
                Err(e) => Box::new(std::iter::once(Err(ReaderError::from(e).into()))),
            },
            CsvSource::Data(text) => tuple_stream(csv::Reader::from_reader(text.as_bytes())),
        }
    }

    fn ast(&self) -> Ast {
        let source = match &self.source {
            CsvSource::Path(path) => path.display().to_string(),
            // Inline text is identified by digest so distinct data never
            // compares structurally equal.
            CsvSource::Data(text) => format!("inline:{}", hash_bytes(text.as_bytes())),
        };
        ast::leaf_with(self.tag(), serde_json::json!({ "source": source }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn tuple_stream<'a, R: Read + 'a>(mut reader: csv::Reader<R>) -> Tuples<'a> {
    let headers = match reader.headers() {
        Ok(h) => h.clone(),
        Err(e) => return Box::new(std::iter::once(Err(ReaderError::from(e).into()))),
    };
    Box::new(reader.into_records().map(move |record| -> Result<Tuple> {
        let record = record.map_err(ReaderError::from)?;
        let mut tuple = Tuple::new();
        for (attr, field) in headers.iter().zip(record.iter()) {
            tuple.insert(attr, field);
        }
        Ok(tuple)
    }))
}
