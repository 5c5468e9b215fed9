//! Utility functions for the search indexer repository.

use csv_indexer_shared::Document;

use crate::errors::SearchIndexError;

/// Check a batch before it is sent to a backend.
///
/// This utility can be shared across provider implementations so that every
/// backend enforces the same limits.
///
/// # Arguments
///
/// * `documents` - The documents about to be uploaded
/// * `max_batch_size` - Upper bound on the number of documents per call
///
/// # Returns
///
/// * `Ok(())` - If the batch fits and every document has a non-blank key
/// * `Err(SearchIndexError)` - `BatchSizeExceeded` or `ValidationError`
pub fn validate_batch(
    documents: &[Document],
    max_batch_size: usize,
) -> Result<(), SearchIndexError> {
    if documents.len() > max_batch_size {
        return Err(SearchIndexError::batch_size_exceeded(
            documents.len(),
            max_batch_size,
        ));
    }

    if let Some(position) = documents.iter().position(|d| d.key().trim().is_empty()) {
        return Err(SearchIndexError::validation(format!(
            "Document at position {} has an empty key",
            position
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(n: usize) -> Vec<Document> {
        (0..n).map(|i| Document::new("ID", i.to_string())).collect()
    }

    #[test]
    fn test_validate_batch_ok() {
        assert!(validate_batch(&docs(1000), 1000).is_ok());
        assert!(validate_batch(&[], 1000).is_ok());
    }

    #[test]
    fn test_validate_batch_too_large() {
        let result = validate_batch(&docs(1001), 1000);
        assert!(matches!(
            result,
            Err(SearchIndexError::BatchSizeExceeded {
                provided: 1001,
                max: 1000
            })
        ));
    }

    #[test]
    fn test_validate_batch_empty_key() {
        let mut batch = docs(2);
        batch.push(Document::new("ID", " "));
        let result = validate_batch(&batch, 1000);
        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }
}
