//! In-process document-collection backend.
//!
//! # Responsibility
//! - Hold the article collection in memory behind the shared store
//!   contract, mirroring a one-document-per-article remote collection.
//!
//! # Invariants
//! - Query semantics are identical to the flat-file backend: the same
//!   criteria matcher and the same ascending expiry sort.
//! - The mutex exists for interior mutability under the single-session
//!   model; it is not a multi-session concurrency guarantee.

use crate::model::article::{Article, ArticleCode};
use crate::search::{filter_articles, SearchCriteria};
use crate::store::{ArticleStore, StoreResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Memory-backed article collection.
///
/// Stands in for the remote document store in tests and offline use; each
/// stored row corresponds to one document with the canonical fields and no
/// synthetic id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<Article>>,
}

impl MemoryStore {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection pre-seeded with the given rows.
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            documents: Mutex::new(articles),
        }
    }

    fn documents(&self) -> MutexGuard<'_, Vec<Article>> {
        // single-session model: a poisoned lock still holds consistent
        // data, so recover instead of failing the interaction
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ArticleStore for MemoryStore {
    fn load_or_init(&self) -> StoreResult<Vec<Article>> {
        Ok(self.documents().clone())
    }

    fn query(&self, criteria: &SearchCriteria) -> StoreResult<Vec<Article>> {
        Ok(filter_articles(&self.documents(), criteria))
    }

    fn upsert(&self, articles: &[Article]) -> StoreResult<()> {
        let incoming: HashMap<&str, &Article> = articles
            .iter()
            .map(|article| (article.code.as_str(), article))
            .collect();
        let mut documents = self.documents();
        for row in documents.iter_mut() {
            if let Some(update) = incoming.get(row.code.as_str()) {
                *row = (*update).clone();
            }
        }
        Ok(())
    }

    fn delete(&self, codes: &[ArticleCode]) -> StoreResult<()> {
        let doomed: HashSet<&str> = codes.iter().map(String::as_str).collect();
        self.documents()
            .retain(|row| !doomed.contains(row.code.as_str()));
        Ok(())
    }

    fn insert(&self, articles: &[Article]) -> StoreResult<()> {
        self.documents().extend(articles.iter().cloned());
        Ok(())
    }
}
