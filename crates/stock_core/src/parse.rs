//! Freeform article input parsing.
//!
//! # Responsibility
//! - Turn pasted comma-separated text into validated article rows.
//! - Surface one example-based help message for every malformed input.
//!
//! # Invariants
//! - Parsing is all-or-nothing: no partial row set survives a failure.
//! - The user-facing message never distinguishes a parse failure from a
//!   validation failure, but the concrete cause is preserved internally
//!   and reachable through `Error::source`.

use crate::model::article::{column_names, Article, SCHEMA};
use crate::model::table::RawTable;
use crate::validate::{validate_table, ValidationError};
use csv::ReaderBuilder;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for the parse APIs.
pub type ParseResult<T> = Result<T, ParseError>;

/// User-facing parse failure.
#[derive(Debug)]
pub enum ParseError {
    /// The submitted text was empty or whitespace-only.
    EmptyInput,
    /// Anything else; the help message covers every cause at once.
    Malformed { cause: MalformedCause },
}

/// Concrete reason behind a [`ParseError::Malformed`].
///
/// Kept internal to the error so diagnostics stay available while the
/// user-facing text remains the single combined help message.
#[derive(Debug)]
pub enum MalformedCause {
    /// CSV-level decode failure (unbalanced quotes and similar).
    Csv(csv::Error),
    /// A record did not have exactly four fields.
    FieldCount { line: usize, found: usize },
    /// The rows decoded but failed batch validation.
    Invalid(ValidationError),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "enter at least one article to add"),
            Self::Malformed { .. } => write!(
                f,
                "the submitted articles are not valid; please check the following:\n\
                 - values must be comma-separated with columns: code, designation, dlc, quantite\n\
                 - dates must be valid and use the YYYY-MM-DD format\n\
                 - quantities must be non-negative integers\n\
                 - article codes must be unique\n\
                 - no value may be left empty\n\
                 example:\n\
                 001,Article 1,2022-12-31,10\n\
                 002,Article 2,2023-01-15,20\n\
                 003,Article 3,2023-02-28,30"
            ),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyInput => None,
            Self::Malformed { cause } => match cause {
                MalformedCause::Csv(err) => Some(err),
                MalformedCause::FieldCount { .. } => None,
                MalformedCause::Invalid(err) => Some(err),
            },
        }
    }
}

impl From<MalformedCause> for ParseError {
    fn from(cause: MalformedCause) -> Self {
        Self::Malformed { cause }
    }
}

/// Parses freeform comma-separated text into validated articles.
///
/// Each non-empty line is one headerless CSV record mapped positionally
/// onto `(code, designation, dlc, quantite)`. Rows that decode are passed
/// through whole-batch validation before being reported as insertable.
///
/// # Errors
/// - [`ParseError::EmptyInput`] for blank input.
/// - [`ParseError::Malformed`] for every other failure, with the concrete
///   cause preserved in [`MalformedCause`].
pub fn parse_articles(text: &str) -> ParseResult<Vec<Article>> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.trim().as_bytes());

    let columns = column_names().iter().map(|name| name.to_string()).collect();
    let mut table = RawTable::new(columns);

    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(MalformedCause::Csv)?;
        let cells: Vec<Option<String>> = record
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
        if cells.iter().all(Option::is_none) {
            continue;
        }
        if cells.len() != SCHEMA.len() {
            return Err(MalformedCause::FieldCount {
                line: line + 1,
                found: cells.len(),
            }
            .into());
        }
        // push cannot fail here: the cell count was just checked
        let _ = table.push_row(cells);
    }

    if table.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    validate_table(&table).map_err(|err| MalformedCause::Invalid(err).into())
}
