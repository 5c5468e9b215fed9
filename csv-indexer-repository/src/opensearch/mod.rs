//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend, plus the translation of an `IndexSchema`
//! into OpenSearch settings and mappings.

mod index_config;
mod provider;

pub use index_config::{field_mapping, get_index_body};
pub use provider::OpenSearchProvider;
