//! Whole-batch validation of article tables.
//!
//! # Responsibility
//! - Confirm the column set, per-column types, quantity range, code
//!   uniqueness and absence of missing values for a submitted batch.
//! - Produce the typed rows once every check passes.
//!
//! # Invariants
//! - Checks run in a fixed order and short-circuit at the first failure.
//! - Validation is all-or-nothing: one invalid row invalidates the whole
//!   batch, and no partial result is ever returned.

use crate::model::article::{Article, FieldType, DATE_FORMAT, SCHEMA};
use crate::model::table::RawTable;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for validation APIs.
pub type ValidateResult<T> = Result<T, ValidationError>;

/// Batch validation failure, one variant per check.
///
/// The column checks name the offending column; the remaining checks are
/// deliberately generic and do not identify a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Column set differs from the canonical four columns.
    ColumnMismatch {
        /// Columns found in the submitted table.
        found: Vec<String>,
    },
    /// First column whose cells do not conform to the expected type.
    ColumnType {
        column: String,
        expected: FieldType,
    },
    /// At least one quantity is negative.
    NegativeQuantity,
    /// At least two rows share the same code.
    DuplicateCode,
    /// At least one cell is missing.
    MissingValue,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnMismatch { found } => write!(
                f,
                "invalid columns [{}]: expected exactly code, designation, dlc, quantite",
                found.join(", ")
            ),
            Self::ColumnType { column, expected } => {
                write!(f, "column `{column}` must contain {} values", expected.label())
            }
            Self::NegativeQuantity => {
                write!(f, "column `quantite` must be greater than or equal to zero")
            }
            Self::DuplicateCode => write!(f, "article codes must be unique"),
            Self::MissingValue => write!(f, "data must not contain missing values"),
        }
    }
}

impl Error for ValidationError {}

/// Validates an untyped batch and returns the typed rows.
///
/// Check order (short-circuiting):
/// 1. column-set equality against the canonical schema (order irrelevant)
/// 2. per-column type conformance over non-missing cells, in canonical
///    column order
/// 3. every quantity `>= 0`
/// 4. every code unique
/// 5. no missing cell anywhere
pub fn validate_table(table: &RawTable) -> ValidateResult<Vec<Article>> {
    check_columns(table)?;
    check_column_types(table)?;
    check_quantities(table)?;
    check_unique_codes(table)?;
    check_missing_values(table)?;
    Ok(collect_articles(table))
}

/// Validates rows that are already typed.
///
/// The column and type checks hold by construction for [`Article`] values,
/// so only the quantity range and code uniqueness checks apply. Used on the
/// reconciler's modified subset before persistence.
pub fn validate_articles(articles: &[Article]) -> ValidateResult<()> {
    if articles.iter().any(|article| article.quantite < 0) {
        return Err(ValidationError::NegativeQuantity);
    }
    let mut seen = HashSet::new();
    for article in articles {
        if !seen.insert(article.code.as_str()) {
            return Err(ValidationError::DuplicateCode);
        }
    }
    Ok(())
}

fn check_columns(table: &RawTable) -> ValidateResult<()> {
    let expected: BTreeSet<&str> = SCHEMA.iter().map(|(name, _)| *name).collect();
    let found: BTreeSet<&str> = table.columns().iter().map(String::as_str).collect();
    if found != expected || table.columns().len() != SCHEMA.len() {
        return Err(ValidationError::ColumnMismatch {
            found: table.columns().to_vec(),
        });
    }
    Ok(())
}

fn check_column_types(table: &RawTable) -> ValidateResult<()> {
    for (name, field_type) in SCHEMA {
        let Some(index) = table.column_index(name) else {
            // check_columns already guarantees presence
            continue;
        };
        for row in table.rows() {
            let Some(cell) = row[index].as_deref() else {
                // absent cells are the missing-value check's business
                continue;
            };
            if !cell_conforms(cell, field_type) {
                return Err(ValidationError::ColumnType {
                    column: name.to_string(),
                    expected: field_type,
                });
            }
        }
    }
    Ok(())
}

fn cell_conforms(cell: &str, field_type: FieldType) -> bool {
    match field_type {
        FieldType::Text => true,
        FieldType::Date => NaiveDate::parse_from_str(cell, DATE_FORMAT).is_ok(),
        FieldType::Integer => cell.parse::<i64>().is_ok(),
    }
}

fn check_quantities(table: &RawTable) -> ValidateResult<()> {
    let Some(index) = table.column_index("quantite") else {
        return Ok(());
    };
    for row in table.rows() {
        if let Some(cell) = row[index].as_deref() {
            if let Ok(quantity) = cell.parse::<i64>() {
                if quantity < 0 {
                    return Err(ValidationError::NegativeQuantity);
                }
            }
        }
    }
    Ok(())
}

fn check_unique_codes(table: &RawTable) -> ValidateResult<()> {
    let Some(index) = table.column_index("code") else {
        return Ok(());
    };
    let mut seen = HashSet::new();
    for row in table.rows() {
        if let Some(cell) = row[index].as_deref() {
            if !seen.insert(cell) {
                return Err(ValidationError::DuplicateCode);
            }
        }
    }
    Ok(())
}

fn check_missing_values(table: &RawTable) -> ValidateResult<()> {
    let has_missing = table
        .rows()
        .iter()
        .any(|row| row.iter().any(Option::is_none));
    if has_missing {
        return Err(ValidationError::MissingValue);
    }
    Ok(())
}

/// Builds typed rows from a table that passed every check.
fn collect_articles(table: &RawTable) -> Vec<Article> {
    let code_idx = table.column_index("code").unwrap_or(0);
    let designation_idx = table.column_index("designation").unwrap_or(1);
    let dlc_idx = table.column_index("dlc").unwrap_or(2);
    let quantite_idx = table.column_index("quantite").unwrap_or(3);

    table
        .rows()
        .iter()
        .filter_map(|row| {
            let code = row[code_idx].as_deref()?;
            let designation = row[designation_idx].as_deref()?;
            let dlc = NaiveDate::parse_from_str(row[dlc_idx].as_deref()?, DATE_FORMAT).ok()?;
            let quantite = row[quantite_idx].as_deref()?.parse::<i64>().ok()?;
            Some(Article::new(code, designation, dlc, quantite))
        })
        .collect()
}
