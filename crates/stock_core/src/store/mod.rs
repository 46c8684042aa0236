//! Persistence adapter boundary for the article catalog.
//!
//! # Responsibility
//! - Define the narrow load/query/write contract shared by every backend.
//! - Keep backend details (file layout, collection shape) out of the
//!   service and reconciliation layers.
//!
//! # Invariants
//! - `upsert` only replaces rows whose code already exists; it never
//!   inserts. Brand-new rows go through `insert` exclusively.
//! - `delete` of an absent code is a no-op, not an error.
//! - An empty store yields an empty row set with the canonical schema,
//!   never an error.

use crate::model::article::{Article, ArticleCode};
use crate::search::SearchCriteria;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod csv_store;
pub mod mem_store;

pub use csv_store::CsvStore;
pub use mem_store::MemoryStore;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Backend failure. Variants keep the concrete cause for logs while the
/// `Display` text stays a single generic user-facing message per cause
/// class.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying I/O failure (open, create, rename, read, write).
    Io(std::io::Error),
    /// CSV encode/decode failure in the flat-file backend.
    Csv(csv::Error),
    /// The backing data exists but does not match the canonical schema.
    Corrupt { message: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot access the article store: {err}"),
            Self::Csv(err) => write!(f, "cannot read the article store: {err}"),
            Self::Corrupt { message } => write!(f, "the article store is corrupt: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Corrupt { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for StoreError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Narrow persistence contract shared by the flat-file and document
/// backends.
pub trait ArticleStore {
    /// Returns every stored row, creating an empty store with the
    /// canonical schema when none exists yet.
    fn load_or_init(&self) -> StoreResult<Vec<Article>>;

    /// Returns the rows matching the criteria, sorted ascending by expiry.
    fn query(&self, criteria: &SearchCriteria) -> StoreResult<Vec<Article>>;

    /// Replaces each row whose code already exists. Codes absent from the
    /// store are ignored; use [`ArticleStore::insert`] for new rows.
    fn upsert(&self, articles: &[Article]) -> StoreResult<()>;

    /// Removes the rows matching the given codes. Missing codes are
    /// ignored.
    fn delete(&self, codes: &[ArticleCode]) -> StoreResult<()>;

    /// Appends brand-new rows. The caller guarantees the batch passed
    /// validation and that the codes are not already present.
    fn insert(&self, articles: &[Article]) -> StoreResult<()>;
}
