use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Evaluation error: {0}")]
    Eval(String),

    #[error("Hashing error: {0}")]
    Hash(String),

    // The core crate does not do I/O, but leaf readers map their I/O
    // errors into this variant so they propagate through tuple streams.
    #[error("I/O-like error (mapped into core): {0}")]
    IoLike(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}

impl Error {
    /// Missing-attribute evaluation failure, shared by predicates and
    /// extension closures.
    pub fn unknown_attribute(attr: &str) -> Self {
        Error::Eval(format!("unknown attribute `{attr}`"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}
