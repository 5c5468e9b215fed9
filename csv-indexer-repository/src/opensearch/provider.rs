//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use csv_indexer_shared::{Document, IndexSchema};
use opensearch::{
    auth::Credentials,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts},
    BulkParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::ConnectionConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::get_index_body;
use crate::types::{BatchOperationSummary, DocumentFailure};
use crate::utils;

/// OpenSearch provider implementation.
///
/// Holds a single client for the lifetime of a rebuild.
///
/// # Example
///
/// ```ignore
/// use csv_indexer_repository::{ConnectionConfig, OpenSearchProvider, SearchIndexProvider};
///
/// let provider = OpenSearchProvider::new(ConnectionConfig::new("http://localhost:9200"))?;
/// provider.delete_index("features").await?;
/// provider.create_index(&schema).await?;
/// let summary = provider.upload_batch("features", &documents).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    config: ConnectionConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider for the configured URL.
    ///
    /// No request is sent here; connection problems surface on the first call.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint, credentials, request timeout and batch limit
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the transport can't be built
    pub fn new(config: ConnectionConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(config.request_timeout);
        if let Some((username, password)) = &config.credentials {
            builder = builder.auth(Credentials::Basic(username.clone(), password.clone()));
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %config.url,
            authenticated = config.credentials.is_some(),
            timeout_secs = config.request_timeout.as_secs(),
            "Created OpenSearch provider"
        );

        Ok(Self { client, config })
    }

    /// Map a transport error, keeping timeouts distinct from other failures.
    fn transport_error(
        err: opensearch::Error,
        otherwise: fn(String) -> SearchIndexError,
    ) -> SearchIndexError {
        if err.is_timeout() {
            SearchIndexError::timeout(err.to_string())
        } else {
            otherwise(err.to_string())
        }
    }

    /// Build the NDJSON bulk body: one `index` action per document, `_id` = key.
    fn bulk_body(documents: &[Document]) -> Result<Vec<JsonBody<Value>>, SearchIndexError> {
        let mut body = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            let source = serde_json::to_value(document)
                .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
            body.push(JsonBody::new(json!({ "index": { "_id": document.key() } })));
            body.push(JsonBody::new(source));
        }
        Ok(body)
    }
}

/// Extract per-document failures from a bulk response.
///
/// Items without an `error` object were accepted. When an item carries no `_id`
/// the key is taken from the document at the same position.
pub(crate) fn parse_bulk_response(
    response: &Value,
    documents: &[Document],
) -> Result<BatchOperationSummary, SearchIndexError> {
    let items = response
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Bulk response has no items array"))?;

    if !response
        .get("errors")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        return Ok(BatchOperationSummary::all_succeeded(documents.len()));
    }

    let mut failures = Vec::new();
    for (position, item) in items.iter().enumerate() {
        let Some(action) = item.as_object().and_then(|o| o.values().next()) else {
            continue;
        };
        let Some(error) = action.get("error") else {
            continue;
        };

        let key = action
            .get("_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| documents.get(position).map(|d| d.key().to_string()))
            .unwrap_or_default();

        let reason = match error {
            Value::String(reason) => reason.clone(),
            _ => {
                let kind = error.get("type").and_then(Value::as_str).unwrap_or("error");
                match error.get("reason").and_then(Value::as_str) {
                    Some(reason) => format!("{}: {}", kind, reason),
                    None => kind.to_string(),
                }
            }
        };

        failures.push(DocumentFailure::new(key, reason));
    }

    Ok(BatchOperationSummary::from_failures(documents.len(), failures))
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    /// Delete an index, treating 404 as success.
    async fn delete_index(&self, name: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| Self::transport_error(e, SearchIndexError::IndexDeletionError))?;

        let status = response.status_code();

        // 404 is acceptable - index may not exist yet
        if status.as_u16() == 404 {
            debug!(index = %name, "Index did not exist");
            return Ok(());
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete index request failed");
            return Err(SearchIndexError::index_deletion(format!(
                "Delete index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %name, "Index deleted");
        Ok(())
    }

    /// Create an index with settings and mappings derived from the schema.
    async fn create_index(&self, schema: &IndexSchema) -> Result<(), SearchIndexError> {
        let body = get_index_body(schema);

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(schema.name()))
            .body(body)
            .send()
            .await
            .map_err(|e| Self::transport_error(e, SearchIndexError::IndexCreationError))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Create index request failed");
            return Err(SearchIndexError::index_creation(format!(
                "Create index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(
            index = %schema.name(),
            field_count = schema.fields().len(),
            "Index created"
        );
        Ok(())
    }

    /// Upsert documents through the bulk API.
    ///
    /// A rejected request is an error; documents rejected individually are
    /// returned in the summary.
    async fn upload_batch(
        &self,
        index: &str,
        documents: &[Document],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        utils::validate_batch(documents, self.config.max_batch_size)?;

        if documents.is_empty() {
            return Ok(BatchOperationSummary::all_succeeded(0));
        }

        let body = Self::bulk_body(documents)?;

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| Self::transport_error(e, SearchIndexError::BulkIndexError))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_index(format!(
                "Bulk upload failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let summary = parse_bulk_response(&response_body, documents)?;
        if summary.has_failures() {
            warn!(
                index = %index,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Bulk upload completed with some failures"
            );
        } else {
            debug!(index = %index, count = summary.succeeded, "Bulk upload completed");
        }

        Ok(summary)
    }
}
