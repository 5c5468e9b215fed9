//! # CSV Indexer
//!
//! Rebuilds an OpenSearch index from a delimited feature file.
//!
//! ## Architecture
//!
//! The indexer follows the Source-Processor-Loader pattern:
//!
//! 1. **Source**: Reads raw rows from the delimited file
//! 2. **Processor**: Coerces rows into typed documents and synthesizes geo points
//! 3. **Loader**: Deletes, recreates and bulk loads the index
//! 4. **Orchestrator**: Sequences the rebuild and batches documents
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`source`]: Delimited file row source
//! - [`schema`]: The features index schema
//! - [`processor`]: Row to document coercion
//! - [`loader`]: Batch accumulation and index client calls
//! - [`orchestrator`]: Coordinates the rebuild
//! - [`errors`]: Error types for the indexer

pub mod config;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod schema;
pub mod source;

pub use config::{Dependencies, IndexerConfig};
pub use errors::IngestError;

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
