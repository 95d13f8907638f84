//! Error definitions for the documentation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while capturing, storing or rendering documentation.
///
/// None of these ever reach the HTTP client; callers log and move on.
#[derive(Debug, Error)]
pub enum DocError {
    /// Reading or writing a documentation file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted spec could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A multipart body could not be parsed.
    #[error("multipart error: {0}")]
    Multipart(#[from] multer::Error),

    /// A multipart text field exceeded the in-memory cap.
    #[error("multipart field {name} exceeds {limit} bytes")]
    FieldTooLarge { name: String, limit: u64 },

    /// The writer thread could not be spawned.
    #[error("failed to start documentation writer: {0}")]
    Worker(#[source] std::io::Error),

    /// A configured output path could not be made absolute.
    #[error("cannot resolve path {}: {source}", path.display())]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for documentation operations.
pub type DocResult<T> = Result<T, DocError>;

impl DocError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
