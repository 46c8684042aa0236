//! Flat-file CSV backend.
//!
//! # Responsibility
//! - Persist the article catalog as one CSV file with the canonical header
//!   `code,designation,dlc,quantite` and ISO dates.
//! - Create the file with the header on first use.
//!
//! # Invariants
//! - Every write rewrites the whole file; there is no partial update.
//! - A file whose header differs from the canonical column set is reported
//!   as corrupt instead of being silently rewritten.

use crate::model::article::{column_names, Article, ArticleCode, DATE_FORMAT};
use crate::search::{filter_articles, SearchCriteria};
use crate::store::{ArticleStore, StoreError, StoreResult};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use log::info;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// CSV-file-backed article store.
///
/// The handle is cheap: each operation opens the file on demand, so one
/// instance can be constructed per interaction and passed down explicitly.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Creates a store handle for the given file path. No I/O happens
    /// until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StoreResult<Vec<Article>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let expected: BTreeSet<&str> = column_names().into_iter().collect();
        let found: BTreeSet<String> = reader
            .headers()?
            .iter()
            .map(|column| column.trim().to_string())
            .collect();
        if found.iter().map(String::as_str).collect::<BTreeSet<_>>() != expected {
            return Err(StoreError::Corrupt {
                message: format!(
                    "unexpected header [{}]",
                    found.into_iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        // map header positions so a column-reordered file still loads
        let header: Vec<String> = reader
            .headers()?
            .iter()
            .map(|column| column.trim().to_string())
            .collect();
        let index_of = |name: &str| -> usize {
            header
                .iter()
                .position(|column| column == name)
                .unwrap_or_default()
        };
        let (code_idx, designation_idx, dlc_idx, quantite_idx) = (
            index_of("code"),
            index_of("designation"),
            index_of("dlc"),
            index_of("quantite"),
        );

        let mut articles = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let cell = |index: usize| record.get(index).unwrap_or("").trim().to_string();
            let dlc = NaiveDate::parse_from_str(&cell(dlc_idx), DATE_FORMAT).map_err(|err| {
                StoreError::Corrupt {
                    message: format!("row {}: bad date `{}`: {err}", row + 1, cell(dlc_idx)),
                }
            })?;
            let quantite = cell(quantite_idx)
                .parse::<i64>()
                .map_err(|err| StoreError::Corrupt {
                    message: format!(
                        "row {}: bad quantity `{}`: {err}",
                        row + 1,
                        cell(quantite_idx)
                    ),
                })?;
            articles.push(Article::new(
                cell(code_idx),
                cell(designation_idx),
                dlc,
                quantite,
            ));
        }
        Ok(articles)
    }

    fn write_all(&self, articles: &[Article]) -> StoreResult<()> {
        let mut writer = WriterBuilder::new().from_path(&self.path)?;
        writer.write_record(column_names())?;
        for article in articles {
            writer.write_record(article.to_cells())?;
        }
        writer.flush().map_err(StoreError::Io)?;
        Ok(())
    }
}

impl ArticleStore for CsvStore {
    fn load_or_init(&self) -> StoreResult<Vec<Article>> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            self.write_all(&[])?;
            info!(
                "event=store_init module=store backend=csv status=ok path={}",
                self.path.display()
            );
            return Ok(Vec::new());
        }
        self.read_all()
    }

    fn query(&self, criteria: &SearchCriteria) -> StoreResult<Vec<Article>> {
        let articles = self.load_or_init()?;
        Ok(filter_articles(&articles, criteria))
    }

    fn upsert(&self, articles: &[Article]) -> StoreResult<()> {
        if articles.is_empty() {
            return Ok(());
        }
        let incoming: HashMap<&str, &Article> = articles
            .iter()
            .map(|article| (article.code.as_str(), article))
            .collect();
        let mut stored = self.load_or_init()?;
        let mut replaced = 0usize;
        for row in &mut stored {
            if let Some(update) = incoming.get(row.code.as_str()) {
                *row = (*update).clone();
                replaced += 1;
            }
        }
        self.write_all(&stored)?;
        info!(
            "event=store_upsert module=store backend=csv status=ok replaced={replaced} submitted={}",
            articles.len()
        );
        Ok(())
    }

    fn delete(&self, codes: &[ArticleCode]) -> StoreResult<()> {
        if codes.is_empty() {
            return Ok(());
        }
        let doomed: HashSet<&str> = codes.iter().map(String::as_str).collect();
        let mut stored = self.load_or_init()?;
        let before = stored.len();
        stored.retain(|row| !doomed.contains(row.code.as_str()));
        let removed = before - stored.len();
        self.write_all(&stored)?;
        info!(
            "event=store_delete module=store backend=csv status=ok removed={removed} submitted={}",
            codes.len()
        );
        Ok(())
    }

    fn insert(&self, articles: &[Article]) -> StoreResult<()> {
        if articles.is_empty() {
            return Ok(());
        }
        let mut stored = self.load_or_init()?;
        stored.extend(articles.iter().cloned());
        self.write_all(&stored)?;
        info!(
            "event=store_insert module=store backend=csv status=ok inserted={}",
            articles.len()
        );
        Ok(())
    }
}
