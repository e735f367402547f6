use thiserror::Error;

use relvar_core::Error as CoreError;

/// Reader-boundary failures; mapped into the core error before they
/// enter a tuple stream.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<ReaderError> for CoreError {
    fn from(e: ReaderError) -> Self {
        CoreError::IoLike(e.to_string())
    }
}
