//! Source module for the index rebuild.
//!
//! Produces raw rows from a delimited file whose first row is the header.

mod csv_source;
mod raw_row;

pub use csv_source::{CsvRowSource, DEFAULT_DELIMITER};
pub use raw_row::RawRow;

use crate::errors::IngestError;

/// An ordered source of raw rows.
///
/// Column names are fixed by the header for the whole source. Iteration yields
/// data rows only; an `Err` item means the source can no longer be read.
pub trait RowSource: Iterator<Item = Result<RawRow, IngestError>> {
    /// Column names in header order.
    fn columns(&self) -> &[String];
}
