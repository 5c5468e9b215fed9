//! Interface definitions for the index client boundary.
//!
//! The `SearchIndexProvider` trait is what the pipeline depends on, so backends can be
//! swapped and tests can inject a mock.

mod search_index_provider;

pub use search_index_provider::SearchIndexProvider;
