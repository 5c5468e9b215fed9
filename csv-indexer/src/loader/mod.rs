//! Loader module for the index rebuild.
//!
//! Wraps the index client: index lifecycle calls and batch uploads, each bounded
//! by a request timeout.

mod batch;

pub use batch::BatchAccumulator;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, instrument, warn};

use crate::errors::IngestError;
use csv_indexer_repository::config::DEFAULT_REQUEST_TIMEOUT;
use csv_indexer_repository::{BatchOperationSummary, SearchIndexError, SearchIndexProvider};
use csv_indexer_shared::{Document, IndexSchema};

/// Configuration for the search loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Upper bound on a single call to the index.
    pub request_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Loader that drives the search index for one index name.
///
/// The loader is responsible for:
/// - Deleting and creating the index
/// - Uploading batches and reporting per-document failures
/// - Turning timeouts and client errors into [`IngestError`]s
pub struct SearchLoader {
    provider: Arc<dyn SearchIndexProvider>,
    index: String,
    config: LoaderConfig,
}

impl SearchLoader {
    /// Create a search loader for an index.
    pub fn with_config(
        provider: Arc<dyn SearchIndexProvider>,
        index: impl Into<String>,
        config: LoaderConfig,
    ) -> Self {
        Self {
            provider,
            index: index.into(),
            config,
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Delete the index. An index that doesn't exist counts as deleted.
    #[instrument(skip(self), fields(index = %self.index))]
    pub async fn delete_index(&self) -> Result<(), IngestError> {
        self.bounded(self.provider.delete_index(&self.index))
            .await
            .map_err(|e| {
                IngestError::index_lifecycle(format!(
                    "Failed to delete index {}: {}",
                    self.index, e
                ))
            })
    }

    /// Create the index with the given schema.
    #[instrument(skip(self, schema), fields(index = %schema.name()))]
    pub async fn create_index(&self, schema: &IndexSchema) -> Result<(), IngestError> {
        self.bounded(self.provider.create_index(schema))
            .await
            .map_err(|e| {
                IngestError::index_lifecycle(format!(
                    "Failed to create index {}: {}",
                    schema.name(),
                    e
                ))
            })
    }

    /// Upload one batch.
    ///
    /// Documents the index rejects individually are logged and returned in the
    /// summary; only a failure of the whole call is an error.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn upload(
        &self,
        documents: &[Document],
    ) -> Result<BatchOperationSummary, IngestError> {
        let count = documents.len();
        if count == 0 {
            return Ok(BatchOperationSummary::all_succeeded(0));
        }

        debug!(count = count, "Uploading batch to search index");

        match self
            .bounded(self.provider.upload_batch(&self.index, documents))
            .await
        {
            Ok(summary) => {
                if summary.has_failures() {
                    warn!(
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "Batch upload completed with some failures"
                    );
                    for failure in &summary.failures {
                        error!(
                            key = %failure.key,
                            reason = %failure.reason,
                            "Failed to index document"
                        );
                    }
                }
                Ok(summary)
            }
            Err(e) => {
                error!(error = %e, count = count, "Failed to upload batch");
                Err(IngestError::batch_upload(count, e.to_string()))
            }
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, SearchIndexError>>,
    ) -> Result<T, SearchIndexError> {
        match tokio::time::timeout(self.config.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(SearchIndexError::timeout(format!(
                "no response within {:?}",
                self.config.request_timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use csv_indexer_repository::DocumentFailure;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock search provider for testing.
    struct MockSearchProvider {
        uploaded_count: AtomicUsize,
        fail_delete: bool,
        stall: bool,
        reject_key: Option<String>,
    }

    impl MockSearchProvider {
        fn new() -> Self {
            Self {
                uploaded_count: AtomicUsize::new(0),
                fail_delete: false,
                stall: false,
                reject_key: None,
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockSearchProvider {
        async fn delete_index(&self, _name: &str) -> Result<(), SearchIndexError> {
            if self.fail_delete {
                return Err(SearchIndexError::connection("connection refused"));
            }
            Ok(())
        }

        async fn create_index(&self, _schema: &IndexSchema) -> Result<(), SearchIndexError> {
            if self.stall {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            Ok(())
        }

        async fn upload_batch(
            &self,
            _index: &str,
            documents: &[Document],
        ) -> Result<BatchOperationSummary, SearchIndexError> {
            if self.stall {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            self.uploaded_count.fetch_add(documents.len(), Ordering::SeqCst);
            let failures = documents
                .iter()
                .filter(|d| Some(d.key()) == self.reject_key.as_deref())
                .map(|d| DocumentFailure::new(d.key(), "mapper_parsing_exception: bad value"))
                .collect();
            Ok(BatchOperationSummary::from_failures(documents.len(), failures))
        }
    }

    fn loader(provider: Arc<MockSearchProvider>) -> SearchLoader {
        SearchLoader::with_config(provider, "features", LoaderConfig::default())
    }

    fn docs(count: usize) -> Vec<Document> {
        (0..count).map(|i| Document::new("ID", i.to_string())).collect()
    }

    #[tokio::test]
    async fn test_upload() {
        let provider = Arc::new(MockSearchProvider::new());
        let loader = loader(provider.clone());

        let summary = loader.upload(&docs(2)).await.unwrap();

        assert_eq!(summary.succeeded, 2);
        assert_eq!(provider.uploaded_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_upload_skips_provider() {
        let provider = Arc::new(MockSearchProvider::new());
        let loader = loader(provider.clone());

        let summary = loader.upload(&[]).await.unwrap();

        assert_eq!(summary.total, 0);
        assert_eq!(provider.uploaded_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_is_not_an_error() {
        let mut provider = MockSearchProvider::new();
        provider.reject_key = Some("1".to_string());
        let loader = loader(Arc::new(provider));

        let summary = loader.upload(&docs(3)).await.unwrap();

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].key, "1");
    }

    #[tokio::test]
    async fn test_delete_failure_is_lifecycle_error() {
        let mut provider = MockSearchProvider::new();
        provider.fail_delete = true;
        let loader = loader(Arc::new(provider));

        let result = loader.delete_index().await;

        assert!(matches!(result, Err(IngestError::IndexLifecycleError(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_calls_time_out() {
        let mut provider = MockSearchProvider::new();
        provider.stall = true;
        let loader = SearchLoader::with_config(
            Arc::new(provider),
            "features",
            LoaderConfig {
                request_timeout: Duration::from_secs(5),
            },
        );

        let schema = crate::schema::features_schema("features").unwrap();
        assert!(matches!(
            loader.create_index(&schema).await,
            Err(IngestError::IndexLifecycleError(_))
        ));
        assert!(matches!(
            loader.upload(&docs(4)).await,
            Err(IngestError::BatchUploadError { size: 4, .. })
        ));
    }
}
