//! Document processor implementation.
//!
//! Transforms raw source rows into typed documents for indexing.

use std::sync::Arc;

use chrono::FixedOffset;
use tracing::{debug, warn};

use super::coercion::{coerce_integer, coerce_timestamp, CoercionTable, ColumnRule};
use super::geo::{synthesize_geo_point, GeoColumns};
use crate::errors::IngestError;
use crate::source::RawRow;
use csv_indexer_shared::{Document, IndexSchema};

/// Processed result for a single row.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedRow {
    /// Document ready to be queued for upload.
    Document(Document),
    /// Row that can't become a document.
    Rejected { line: u64, reason: String },
}

/// Processor that turns raw rows into documents.
///
/// The processor is responsible for:
/// - Carrying the key column through as text
/// - Coercing integer and timestamp columns, omitting invalid values
/// - Synthesizing the geo point from the latitude/longitude columns
pub struct DocumentProcessor {
    schema: Arc<IndexSchema>,
    geo: GeoColumns,
    rules: CoercionTable,
    offset: FixedOffset,
}

impl DocumentProcessor {
    /// Create a processor for a schema.
    ///
    /// # Arguments
    ///
    /// * `schema` - Schema the documents are built for
    /// * `geo` - Columns feeding the synthesized geo point
    /// * `offset` - Offset attached to timestamps that carry none
    pub fn new(schema: Arc<IndexSchema>, geo: GeoColumns, offset: FixedOffset) -> Self {
        let rules = CoercionTable::from_schema(&schema, &geo);
        Self {
            schema,
            geo,
            rules,
            offset,
        }
    }

    pub fn schema(&self) -> &IndexSchema {
        &self.schema
    }

    /// Check the source header before anything is touched.
    ///
    /// A missing key column is fatal. Missing geo columns only mean no document
    /// will carry a location, so they are logged and tolerated.
    pub fn check_columns(&self, columns: &[String]) -> Result<(), IngestError> {
        let has = |name: &str| columns.iter().any(|c| c == name);
        let key = &self.schema.key_field().name;

        if !has(key.as_str()) {
            return Err(IngestError::source_read(format!(
                "Source is missing key column {}",
                key
            )));
        }

        for column in [&self.geo.latitude, &self.geo.longitude] {
            if !has(column.as_str()) {
                warn!(
                    column = %column,
                    target = %self.geo.target,
                    "Source has no coordinate column, documents will have no location"
                );
            }
        }

        if has(self.geo.target.as_str()) {
            warn!(
                column = %self.geo.target,
                "Source column collides with the synthesized location and will be ignored"
            );
        }

        Ok(())
    }

    /// Process a single row.
    pub fn process_row(&self, row: &RawRow) -> ProcessedRow {
        let key_field = &self.schema.key_field().name;

        let key = match row.get(key_field) {
            Some(key) if !key.trim().is_empty() => key,
            Some(_) => return Self::reject(row, format!("empty {}", key_field)),
            None => return Self::reject(row, format!("missing {}", key_field)),
        };

        let mut doc = Document::new(key_field.as_str(), key);

        for (column, raw) in row.iter() {
            match self.rules.rule(column) {
                ColumnRule::Text => {
                    doc.insert(column, raw);
                }
                ColumnRule::Integer => {
                    if let Some(value) = coerce_integer(raw) {
                        doc.insert(column, value);
                    }
                }
                ColumnRule::Timestamp => {
                    if let Some(value) = coerce_timestamp(raw, self.offset) {
                        doc.insert(column, value);
                    } else if !raw.trim().is_empty() {
                        debug!(
                            line = row.line(),
                            column = column,
                            value = raw,
                            "Dropping unparseable timestamp"
                        );
                    }
                }
                ColumnRule::Key
                | ColumnRule::Latitude
                | ColumnRule::Longitude
                | ColumnRule::Derived => {}
            }
        }

        let latitude = row.get(&self.geo.latitude).unwrap_or("");
        let longitude = row.get(&self.geo.longitude).unwrap_or("");
        if let Some(point) = synthesize_geo_point(latitude, longitude) {
            doc.insert(self.geo.target.as_str(), point);
        }

        ProcessedRow::Document(doc)
    }

    fn reject(row: &RawRow, reason: String) -> ProcessedRow {
        ProcessedRow::Rejected {
            line: row.line(),
            reason,
        }
    }
}
