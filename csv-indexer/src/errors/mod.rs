//! Error types for the index rebuild pipeline.

use thiserror::Error;

/// Errors that can occur while rebuilding the index.
///
/// `SourceReadError` and `IndexLifecycleError` abort a run. `BatchUploadError`
/// is recorded against the failing batch and the run moves on to the next one.
#[derive(Error, Debug, Clone)]
pub enum IngestError {
    /// The source file is missing, unreadable or malformed.
    #[error("Source read error: {0}")]
    SourceReadError(String),

    /// Deleting or creating the index failed.
    #[error("Index lifecycle error: {0}")]
    IndexLifecycleError(String),

    /// A batch upload failed as a whole.
    #[error("Batch upload error ({size} documents): {message}")]
    BatchUploadError { size: usize, message: String },
}

impl IngestError {
    /// Create a source read error.
    pub fn source_read(msg: impl Into<String>) -> Self {
        Self::SourceReadError(msg.into())
    }

    /// Create an index lifecycle error.
    pub fn index_lifecycle(msg: impl Into<String>) -> Self {
        Self::IndexLifecycleError(msg.into())
    }

    /// Create a batch upload error.
    pub fn batch_upload(size: usize, msg: impl Into<String>) -> Self {
        Self::BatchUploadError {
            size,
            message: msg.into(),
        }
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        let location = err
            .position()
            .map(|p| format!(" at line {}", p.line()))
            .unwrap_or_default();
        Self::SourceReadError(format!("{}{}", err, location))
    }
}
