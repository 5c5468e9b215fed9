//! # CSV Indexer Repository
//!
//! This crate provides the trait and implementations for interacting with the
//! search index. It includes definitions for errors, the index client interface,
//! and a concrete implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;
pub mod utils;

pub use config::ConnectionConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use types::{BatchOperationSummary, DocumentFailure};
pub use utils::validate_batch;
