//! Dependency initialization and wiring for the index rebuild.

use std::fs::File;
use std::sync::Arc;

use tracing::info;

use super::IndexerConfig;
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::processor::DocumentProcessor;
use crate::schema::{features_geo_columns, features_schema};
use crate::source::CsvRowSource;
use crate::IndexingError;
use csv_indexer_repository::{ConnectionConfig, OpenSearchProvider, SearchIndexProvider};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// The opened source, header already read.
    pub source: CsvRowSource<File>,
}

impl Dependencies {
    /// Initialize all dependencies from a configuration.
    ///
    /// The source is opened first so that a missing or malformed file is
    /// reported before the index is touched. Creating the OpenSearch client
    /// doesn't contact the server.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the source can't be opened or the client can't be built
    pub fn new(config: &IndexerConfig) -> Result<Self, IndexingError> {
        info!(
            source = %config.source_path.display(),
            opensearch_url = %config.opensearch_url,
            index = %config.index_name,
            batch_size = config.batch_size,
            request_timeout_secs = config.request_timeout.as_secs(),
            "Initializing dependencies"
        );

        let source = CsvRowSource::from_path(&config.source_path, config.delimiter)?;

        let schema = features_schema(&config.index_name)
            .map_err(|e| IndexingError::config(format!("Invalid index schema: {}", e)))?;

        let search_provider = Self::create_provider(config)?;
        info!("OpenSearch client created");

        let processor = DocumentProcessor::new(
            Arc::new(schema),
            features_geo_columns(),
            config.timestamp_offset,
        );

        let orchestrator = Orchestrator::with_config(
            search_provider,
            processor,
            OrchestratorConfig {
                batch_size: config.batch_size,
                request_timeout: config.request_timeout,
            },
        );

        Ok(Self {
            orchestrator,
            source,
        })
    }

    fn create_provider(
        config: &IndexerConfig,
    ) -> Result<Arc<dyn SearchIndexProvider>, IndexingError> {
        let mut connection = ConnectionConfig::new(config.opensearch_url.as_str())
            .with_request_timeout(config.request_timeout);
        if let Some((username, password)) = &config.credentials {
            connection = connection.with_credentials(username.as_str(), password.as_str());
        }

        let provider = OpenSearchProvider::new(connection).map_err(|e| {
            IndexingError::config(format!("Failed to create OpenSearch provider: {}", e))
        })?;

        Ok(Arc::new(provider))
    }
}
