//! # CSV Indexer Shared
//!
//! This crate defines the data structures shared across the CSV index rebuilder.
//! It includes the index schema declaration and the typed documents produced
//! from source rows.

pub mod types;

pub use types::document::{Document, FieldValue, GeoPoint};
pub use types::schema::{FieldType, IndexSchema, SchemaError, SchemaField};
