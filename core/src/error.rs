use thiserror::Error;

/// An import payload the store refuses to load. The previous list is
/// always left untouched when one of these is returned.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

/// Persistence layer failure. These are logged by the store and never
/// block the in-memory mutation that triggered the save.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}
