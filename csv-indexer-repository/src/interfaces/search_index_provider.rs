//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use csv_indexer_shared::{Document, IndexSchema};

use crate::errors::SearchIndexError;
use crate::types::BatchOperationSummary;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// A provider is a long-lived handle shared by every call in a rebuild. It is injected into
/// the orchestrator so that tests can substitute a mock implementation.
///
/// Each method is independently failable and returns `Result<T, SearchIndexError>`.
///
/// # Note on Document Creation
///
/// There is no separate create/update split: `upload_batch` is an upsert keyed by the
/// document key, creating a document if it doesn't exist and replacing it if it does.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Delete an index.
    ///
    /// Deleting an index that does not exist is not an error.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was removed or was already absent
    /// * `Err(SearchIndexError)` - On authentication failure, unavailable service, timeout, etc.
    async fn delete_index(&self, name: &str) -> Result<(), SearchIndexError>;

    /// Create an index with the given schema.
    ///
    /// # Arguments
    ///
    /// * `schema` - The full schema, including the index name
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchIndexError)` - On a malformed schema, name conflict or service error
    async fn create_index(&self, schema: &IndexSchema) -> Result<(), SearchIndexError>;

    /// Upsert a batch of documents by key.
    ///
    /// # Arguments
    ///
    /// * `index` - The target index name
    /// * `documents` - The documents to upload, in order
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - The call was accepted; individual documents may still
    ///   have been rejected and are listed in the summary
    /// * `Err(SearchIndexError)` - If the call failed as a whole
    async fn upload_batch(
        &self,
        index: &str,
        documents: &[Document],
    ) -> Result<BatchOperationSummary, SearchIndexError>;
}
