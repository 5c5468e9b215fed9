//! Orchestrator module for the index rebuild.
//!
//! Coordinates the source, processor, and loader components.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument, warn};

use crate::errors::IngestError;
use crate::loader::{BatchAccumulator, LoaderConfig, SearchLoader};
use crate::processor::{DocumentProcessor, ProcessedRow};
use crate::source::RowSource;
use csv_indexer_repository::config::{DEFAULT_REQUEST_TIMEOUT, MAX_BATCH_SIZE};
use csv_indexer_repository::{DocumentFailure, SearchIndexProvider};
use csv_indexer_shared::Document;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Documents per upload call.
    pub batch_size: usize,
    /// Upper bound on each call to the index.
    pub request_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Where a run currently is.
///
/// `Failed` is reached when the source is unusable or the index can't be
/// deleted or created. Batch failures during `Streaming` don't change the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Deleting,
    Creating,
    Streaming,
    Done,
    Failed,
}

/// A batch whose upload call failed as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedBatch {
    /// 1-based position of the batch in the run.
    pub number: usize,
    pub size: usize,
    pub reason: String,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub rows_read: u64,
    pub rows_rejected: u64,
    /// Documents in batches the index accepted, including ones it rejected individually.
    pub documents_sent: u64,
    pub documents_uploaded: u64,
    pub batches_attempted: usize,
    pub batches_failed: usize,
    pub failed_batches: Vec<FailedBatch>,
    pub document_failures: Vec<DocumentFailure>,
}

impl RunReport {
    /// True when every batch and every document made it into the index.
    pub fn is_clean(&self) -> bool {
        self.batches_failed == 0 && self.document_failures.is_empty()
    }
}

/// Orchestrator that rebuilds the index from a row source.
///
/// The orchestrator:
/// - Validates the source header before touching the index
/// - Deletes and recreates the index, aborting the run if either fails
/// - Streams rows through the processor into bounded batches
/// - Uploads batches in source order, continuing past failed batches
pub struct Orchestrator {
    processor: DocumentProcessor,
    loader: SearchLoader,
    config: OrchestratorConfig,
    state: PipelineState,
}

impl Orchestrator {
    /// Create an orchestrator from its components.
    pub fn with_config(
        provider: Arc<dyn SearchIndexProvider>,
        processor: DocumentProcessor,
        config: OrchestratorConfig,
    ) -> Self {
        let loader = SearchLoader::with_config(
            provider,
            processor.schema().name(),
            LoaderConfig {
                request_timeout: config.request_timeout,
            },
        );

        Self {
            processor,
            loader,
            config,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run the rebuild.
    ///
    /// Returns an error only when the run could not proceed: an unusable source
    /// or a failed index delete/create. Failed batches are listed in the report.
    #[instrument(skip(self, source), fields(index = %self.loader.index()))]
    pub async fn run<S: RowSource>(&mut self, source: S) -> Result<RunReport, IngestError> {
        info!("Starting index rebuild");

        if let Err(e) = self.processor.check_columns(source.columns()) {
            error!(error = %e, "Source is not usable");
            return Err(self.fail(e));
        }

        self.state = PipelineState::Deleting;
        if let Err(e) = self.loader.delete_index().await {
            error!(error = %e, "Failed to delete index");
            error!("Check OPENSEARCH_URL and the OpenSearch credentials");
            return Err(self.fail(e));
        }
        info!("Index deleted");

        self.state = PipelineState::Creating;
        if let Err(e) = self.loader.create_index(self.processor.schema()).await {
            error!(error = %e, "Failed to create index");
            return Err(self.fail(e));
        }
        info!("Index created");

        self.state = PipelineState::Streaming;
        let mut report = RunReport::default();
        let mut batch = BatchAccumulator::new(self.config.batch_size);

        for row in source {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    error!(error = %e, "Failed to read source row");
                    let pending = batch.drain();
                    self.flush(pending, &mut report).await;
                    return Err(self.fail(e));
                }
            };
            report.rows_read += 1;

            match self.processor.process_row(&row) {
                ProcessedRow::Document(doc) => {
                    if let Some(full) = batch.append(doc) {
                        self.flush(full, &mut report).await;
                    }
                }
                ProcessedRow::Rejected { line, reason } => {
                    warn!(line = line, reason = %reason, "Skipping row");
                    report.rows_rejected += 1;
                }
            }
        }

        let pending = batch.drain();
        self.flush(pending, &mut report).await;

        self.state = PipelineState::Done;
        info!(
            rows_read = report.rows_read,
            rows_rejected = report.rows_rejected,
            documents_sent = report.documents_sent,
            documents_uploaded = report.documents_uploaded,
            batches_attempted = report.batches_attempted,
            batches_failed = report.batches_failed,
            document_failures = report.document_failures.len(),
            "Complete"
        );
        Ok(report)
    }

    /// Upload one batch and record the outcome. Never fails the run.
    async fn flush(&self, documents: Vec<Document>, report: &mut RunReport) {
        if documents.is_empty() {
            return;
        }

        report.batches_attempted += 1;
        let number = report.batches_attempted;
        let size = documents.len();

        match self.loader.upload(&documents).await {
            Ok(summary) => {
                report.documents_sent += size as u64;
                report.documents_uploaded += summary.succeeded as u64;
                report.document_failures.extend(summary.failures);
                info!(
                    batch = number,
                    size = size,
                    succeeded = summary.succeeded,
                    total = report.documents_sent,
                    "{} documents uploaded",
                    size
                );
            }
            Err(e) => {
                error!(batch = number, size = size, error = %e, "Batch upload failed, continuing");
                report.batches_failed += 1;
                report.failed_batches.push(FailedBatch {
                    number,
                    size,
                    reason: e.to_string(),
                });
            }
        }
    }

    fn fail(&mut self, error: IngestError) -> IngestError {
        self.state = PipelineState::Failed;
        error
    }
}
