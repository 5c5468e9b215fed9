//! This module defines the core data structures used across the indexer.
//! It re-exports the schema declaration and document types.

pub mod document;
pub mod schema;

pub use document::{Document, FieldValue, GeoPoint};
pub use schema::{FieldType, IndexSchema, SchemaError, SchemaField};
