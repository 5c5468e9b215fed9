//! Delimited file row source built on the `csv` crate.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::{ByteRecord, Reader, ReaderBuilder};
use tracing::{debug, info};

use super::{RawRow, RowSource};
use crate::errors::IngestError;

/// Default column delimiter (USGS feature files are pipe-delimited).
pub const DEFAULT_DELIMITER: u8 = b'|';

/// Row source over a delimited file.
///
/// The header is read and validated on construction, so an unreadable or
/// malformed source is detected before anything else happens. Cells are decoded
/// as UTF-8 with invalid bytes replaced.
pub struct CsvRowSource<R> {
    reader: Reader<R>,
    columns: Arc<[String]>,
    record: ByteRecord,
}

impl CsvRowSource<File> {
    /// Open a delimited file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the source file
    /// * `delimiter` - Single-byte column delimiter
    ///
    /// # Returns
    ///
    /// * `Ok(CsvRowSource)` - With the header already read
    /// * `Err(IngestError::SourceReadError)` - If the file can't be opened or has no usable header
    pub fn from_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let reader = Self::builder(delimiter).from_path(path).map_err(|e| {
            IngestError::source_read(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let source = Self::from_csv(reader)?;
        info!(
            path = %path.display(),
            column_count = source.columns.len(),
            "Opened source file"
        );
        Ok(source)
    }
}

impl<R: Read> CsvRowSource<R> {
    /// Read delimited data from any reader.
    pub fn from_reader(rdr: R, delimiter: u8) -> Result<Self, IngestError> {
        Self::from_csv(Self::builder(delimiter).from_reader(rdr))
    }

    fn builder(delimiter: u8) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder.delimiter(delimiter).has_headers(true).flexible(true);
        builder
    }

    fn from_csv(mut reader: Reader<R>) -> Result<Self, IngestError> {
        let headers = reader.byte_headers()?.clone();

        let columns: Vec<String> = headers
            .iter()
            .map(|h| {
                String::from_utf8_lossy(h)
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .to_string()
            })
            .collect();

        if columns.iter().all(String::is_empty) {
            return Err(IngestError::source_read("Source has no header row"));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(IngestError::source_read(format!(
                    "Duplicate column in header: {:?}",
                    column
                )));
            }
        }

        debug!(columns = ?columns, "Read source header");

        Ok(Self {
            reader,
            columns: columns.into(),
            record: ByteRecord::new(),
        })
    }
}

impl<R: Read> Iterator for CsvRowSource<R> {
    type Item = Result<RawRow, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_byte_record(&mut self.record) {
            Ok(true) => {
                let line = self.record.position().map(|p| p.line()).unwrap_or(0);
                let values = self
                    .record
                    .iter()
                    .map(|cell| String::from_utf8_lossy(cell).into_owned())
                    .collect();
                Some(Ok(RawRow::new(Arc::clone(&self.columns), values, line)))
            }
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn columns(&self) -> &[String] {
        &self.columns
    }
}
