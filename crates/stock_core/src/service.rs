//! Stock use-case service.
//!
//! # Responsibility
//! - Orchestrate parse, validation, reconciliation and persistence into
//!   the three user-facing flows: search, add, save-edits.
//! - Keep callers decoupled from backend details.
//!
//! # Invariants
//! - Every write path validates before touching the store.
//! - The add path rejects codes already present in the live collection,
//!   keeping the collection-wide uniqueness invariant.
//! - A failed interaction leaves the store unchanged except for the
//!   non-transactional upsert-then-delete sequence, which is accepted
//!   as-is (single-session model).

use crate::model::article::{Article, ArticleCode};
use crate::parse::{parse_articles, ParseError};
use crate::reconcile::reconcile;
use crate::search::SearchCriteria;
use crate::store::{ArticleStore, StoreError};
use crate::validate::{validate_articles, ValidationError};
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for stock use-cases.
#[derive(Debug)]
pub enum StockServiceError {
    /// Freeform input failed to parse or validate.
    Parse(ParseError),
    /// An edited batch failed validation.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for StockServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StockServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ParseError> for StockServiceError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<ValidationError> for StockServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for StockServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Result of persisting one edit session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Rows replaced through the upsert path.
    pub updated: usize,
    /// Rows removed through the delete path.
    pub deleted: usize,
    /// Codes that appeared only in the edited snapshot and were ignored.
    pub ignored_new_codes: Vec<ArticleCode>,
}

/// Use-case facade over a persistence backend.
pub struct StockService<S: ArticleStore> {
    store: S,
}

impl<S: ArticleStore> StockService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the rows matching the criteria, sorted ascending by expiry.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Article>, StockServiceError> {
        Ok(self.store.query(criteria)?)
    }

    /// Parses freeform text and inserts the resulting rows.
    ///
    /// The batch has passed whole-batch validation when parsing succeeds;
    /// on top of that, codes already present in the live collection are
    /// rejected so the store-wide uniqueness invariant holds.
    pub fn add_articles(&self, text: &str) -> Result<Vec<Article>, StockServiceError> {
        let batch = parse_articles(text)?;

        let existing: HashSet<ArticleCode> = self
            .store
            .load_or_init()?
            .into_iter()
            .map(|article| article.code)
            .collect();
        if batch.iter().any(|article| existing.contains(&article.code)) {
            return Err(ValidationError::DuplicateCode.into());
        }

        self.store.insert(&batch)?;
        info!(
            "event=add_articles module=service status=ok inserted={}",
            batch.len()
        );
        Ok(batch)
    }

    /// Persists one edit session by diffing the displayed snapshot against
    /// its edited version.
    ///
    /// The modified subset is validated as a whole batch before any store
    /// call; a validation failure aborts the interaction with the store
    /// untouched.
    pub fn save_edits(
        &self,
        original: &[Article],
        edited: &[Article],
    ) -> Result<SaveReport, StockServiceError> {
        let outcome = reconcile(original, edited);
        if outcome.is_noop() {
            return Ok(SaveReport {
                ignored_new_codes: outcome.unknown,
                ..SaveReport::default()
            });
        }

        validate_articles(&outcome.modified)?;

        self.store.upsert(&outcome.modified)?;
        self.store.delete(&outcome.deleted)?;
        info!(
            "event=save_edits module=service status=ok updated={} deleted={} ignored={}",
            outcome.modified.len(),
            outcome.deleted.len(),
            outcome.unknown.len()
        );
        Ok(SaveReport {
            updated: outcome.modified.len(),
            deleted: outcome.deleted.len(),
            ignored_new_codes: outcome.unknown,
        })
    }
}
