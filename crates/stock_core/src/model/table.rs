//! Untyped tabular snapshot feeding batch validation.
//!
//! # Responsibility
//! - Carry column names plus rows of optional string cells between the
//!   parser / edit surfaces and the validator.
//!
//! # Invariants
//! - Every row has exactly as many cells as there are columns.
//! - A missing value is `None`; the empty string never stands in for it.

use crate::model::article::Article;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Untyped table of rows, before schema and type validation.
///
/// Checks like "column set equality" and "no missing values" only make
/// sense before cells are typed, so this shape is what the validator
/// consumes. Cells hold raw strings; `None` marks an absent value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

/// Error for malformed table construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowShapeError {
    /// Zero-based row index of the offending row.
    pub row: usize,
    /// Cells found in the offending row.
    pub found: usize,
    /// Cells expected, i.e. the column count.
    pub expected: usize,
}

impl Display for RowShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {} has {} cells, expected {}",
            self.row, self.found, self.expected
        )
    }
}

impl Error for RowShapeError {}

impl RawTable {
    /// Creates an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends one row; the cell count must match the column count.
    pub fn push_row(&mut self, cells: Vec<Option<String>>) -> Result<(), RowShapeError> {
        if cells.len() != self.columns.len() {
            return Err(RowShapeError {
                row: self.rows.len(),
                found: cells.len(),
                expected: self.columns.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Builds a canonical-column table from already-typed articles.
    ///
    /// Used by edit surfaces that re-submit typed rows for whole-batch
    /// validation, and by the round-trip tests.
    pub fn from_articles(articles: &[Article]) -> Self {
        let columns = crate::model::article::column_names()
            .iter()
            .map(|name| (*name).to_string())
            .collect();
        let rows = articles
            .iter()
            .map(|article| article.to_cells().into_iter().map(Some).collect())
            .collect();
        Self { columns, rows }
    }

    /// Reads a headered CSV document into an untyped table.
    ///
    /// Column names come from the header row; blank cells become missing
    /// values. Used by edit surfaces that round-trip a displayed table
    /// through a file.
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|column| column.trim().to_string())
            .collect();
        let mut table = Self::new(columns);
        for result in csv_reader.records() {
            let record = result?;
            let cells = record
                .iter()
                .map(|cell| {
                    let trimmed = cell.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(trimmed.to_string())
                    }
                })
                .collect();
            // the csv reader already rejects records of unequal length
            let _ = table.push_row(cells);
        }
        Ok(table)
    }

    /// Column names in table order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RawTable;
    use crate::model::article::Article;
    use chrono::NaiveDate;

    #[test]
    fn push_row_rejects_wrong_cell_count() {
        let mut table = RawTable::new(vec!["a".to_string(), "b".to_string()]);
        let error = table
            .push_row(vec![Some("1".to_string())])
            .expect_err("short row must be rejected");
        assert_eq!(error.found, 1);
        assert_eq!(error.expected, 2);
    }

    #[test]
    fn from_articles_uses_canonical_columns() {
        let articles = vec![Article::new(
            "001",
            "Widget",
            NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date"),
            10,
        )];
        let table = RawTable::from_articles(&articles);
        assert_eq!(table.columns(), ["code", "designation", "dlc", "quantite"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0][2].as_deref(), Some("2025-03-15"));
    }
}
