//! Processor module for the index rebuild.
//!
//! Coerces raw rows into typed documents.

mod coercion;
mod document_processor;
mod geo;

pub use coercion::{coerce_integer, coerce_timestamp, CoercionTable, ColumnRule};
pub use document_processor::{DocumentProcessor, ProcessedRow};
pub use geo::{parse_coordinate, synthesize_geo_point, GeoColumns};
