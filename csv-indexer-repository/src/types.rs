//! Result types for search index batch operations.

/// A document the backend refused within an otherwise accepted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// Key of the rejected document.
    pub key: String,
    /// Reason reported by the backend.
    pub reason: String,
}

impl DocumentFailure {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Summary of a batch upload containing aggregate counts and per-document failures.
///
/// A batch call can succeed at the transport level while individual documents
/// are rejected. Those are listed in `failures` so callers can report them by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOperationSummary {
    /// Total number of documents in the batch.
    pub total: usize,
    /// Number of documents accepted.
    pub succeeded: usize,
    /// Number of documents rejected.
    pub failed: usize,
    /// Rejected documents with the backend's reason.
    pub failures: Vec<DocumentFailure>,
}

impl BatchOperationSummary {
    /// Summary for a batch where every document was accepted.
    pub fn all_succeeded(total: usize) -> Self {
        Self {
            total,
            succeeded: total,
            failed: 0,
            failures: Vec::new(),
        }
    }

    /// Build a summary from the rejected documents of a batch of `total`.
    pub fn from_failures(total: usize, failures: Vec<DocumentFailure>) -> Self {
        let failed = failures.len().min(total);
        Self {
            total,
            succeeded: total - failed,
            failed,
            failures,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
