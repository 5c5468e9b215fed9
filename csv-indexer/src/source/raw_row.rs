//! Raw row representation.

use std::sync::Arc;

/// One data row: column name to raw text, in header order.
///
/// Columns are shared with every other row of the same source. A row with fewer
/// cells than the header reads the missing cells as empty text; extra cells are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    columns: Arc<[String]>,
    values: Vec<String>,
    line: u64,
}

impl RawRow {
    /// Create a row.
    ///
    /// # Arguments
    ///
    /// * `columns` - Header column names
    /// * `values` - Cell values in column order
    /// * `line` - Line number in the source, for diagnostics
    pub fn new(columns: Arc<[String]>, values: Vec<String>, line: u64) -> Self {
        Self {
            columns,
            values,
            line,
        }
    }

    /// Raw text for a column, or `None` if the header has no such column.
    pub fn get(&self, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        Some(self.values.get(index).map(String::as_str).unwrap_or(""))
    }

    /// Iterate `(column, raw)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().enumerate().map(|(i, column)| {
            (
                column.as_str(),
                self.values.get(i).map(String::as_str).unwrap_or(""),
            )
        })
    }

    pub fn line(&self) -> u64 {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Arc<[String]> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()].into()
    }

    #[test]
    fn test_get_and_iter() {
        let row = RawRow::new(
            columns(),
            vec!["1".to_string(), "".to_string(), "x".to_string()],
            2,
        );
        assert_eq!(row.get("A"), Some("1"));
        assert_eq!(row.get("B"), Some(""));
        assert_eq!(row.get("Z"), None);
        assert_eq!(row.line(), 2);

        let pairs: Vec<(&str, &str)> = row.iter().collect();
        assert_eq!(pairs, vec![("A", "1"), ("B", ""), ("C", "x")]);
    }

    #[test]
    fn test_short_row_reads_missing_cells_as_empty() {
        let row = RawRow::new(columns(), vec!["1".to_string()], 3);
        assert_eq!(row.get("C"), Some(""));
        assert_eq!(row.iter().count(), 3);
    }

    #[test]
    fn test_long_row_ignores_extra_cells() {
        let row = RawRow::new(
            columns(),
            vec!["1", "2", "3", "4"].into_iter().map(String::from).collect(),
            4,
        );
        assert_eq!(row.iter().count(), 3);
    }
}
