//! Article domain model and schema description.
//!
//! # Responsibility
//! - Define the canonical article record shared by every component.
//! - Describe the fixed four-column schema with semantic types and the
//!   human-readable labels used in validation messages.
//!
//! # Invariants
//! - `code` is the unique key and is immutable once created.
//! - `quantite` must be kept `>= 0`; the field stays signed so that
//!   out-of-range input is a validation failure, not a decode panic.
//! - Serialized documents carry `dlc` as an ISO `YYYY-MM-DD` string.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique article key.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ArticleCode = String;

/// Deployment-fixed date format for parsing and flat-file serialization.
///
/// The localized `DD/MM/YYYY` variant is intentionally not supported; one
/// format is picked and applied everywhere.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Semantic type of one schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Free-form text.
    Text,
    /// Calendar date without a time component.
    Date,
    /// Signed integer (range constraints are the validator's business).
    Integer,
}

impl FieldType {
    /// Human-readable label used in validation error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Integer => "integer",
        }
    }
}

/// Canonical column schema, in canonical order.
///
/// Column names follow the historical store layout (`dlc` is the expiry
/// date, `quantite` the stock count) so files and documents stay readable
/// by existing deployments.
pub const SCHEMA: [(&str, FieldType); 4] = [
    ("code", FieldType::Text),
    ("designation", FieldType::Text),
    ("dlc", FieldType::Date),
    ("quantite", FieldType::Integer),
];

/// Canonical column names, in canonical order.
pub fn column_names() -> [&'static str; 4] {
    [SCHEMA[0].0, SCHEMA[1].0, SCHEMA[2].0, SCHEMA[3].0]
}

/// One perishable article record.
///
/// This is the sole entity of the system; every component operates on rows
/// of this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Unique key. Never edited after creation.
    pub code: ArticleCode,
    /// Free-text description.
    pub designation: String,
    /// Expiry date (date limite de consommation).
    pub dlc: NaiveDate,
    /// Stock count; validated to be non-negative.
    pub quantite: i64,
}

impl Article {
    /// Creates an article record from its four fields.
    pub fn new(
        code: impl Into<String>,
        designation: impl Into<String>,
        dlc: NaiveDate,
        quantite: i64,
    ) -> Self {
        Self {
            code: code.into(),
            designation: designation.into(),
            dlc,
            quantite,
        }
    }

    /// Returns the record as string cells in canonical column order.
    ///
    /// Dates use [`DATE_FORMAT`]; this is the inverse of the freeform
    /// parse path and the flat-file row layout.
    pub fn to_cells(&self) -> [String; 4] {
        [
            self.code.clone(),
            self.designation.clone(),
            self.dlc.format(DATE_FORMAT).to_string(),
            self.quantite.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{column_names, Article, DATE_FORMAT};
    use chrono::NaiveDate;

    #[test]
    fn schema_columns_are_in_canonical_order() {
        assert_eq!(column_names(), ["code", "designation", "dlc", "quantite"]);
    }

    #[test]
    fn article_serializes_with_iso_date_and_no_extra_fields() {
        let article = Article::new(
            "001",
            "Widget",
            NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date"),
            10,
        );
        let value = serde_json::to_value(&article).expect("article serializes");
        assert_eq!(
            value,
            serde_json::json!({
                "code": "001",
                "designation": "Widget",
                "dlc": "2025-03-15",
                "quantite": 10,
            })
        );
    }

    #[test]
    fn cells_round_trip_the_date_format() {
        let article = Article::new(
            "002",
            "Gadget",
            NaiveDate::from_ymd_opt(2025, 4, 1).expect("valid date"),
            5,
        );
        let cells = article.to_cells();
        assert_eq!(cells[2], "2025-04-01");
        let parsed = NaiveDate::parse_from_str(&cells[2], DATE_FORMAT).expect("cell parses back");
        assert_eq!(parsed, article.dlc);
    }
}
