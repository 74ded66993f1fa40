use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an ETL run.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Data root not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Data root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {} at line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),
}
