//! Snapshot reconciliation for the search-and-edit flow.
//!
//! # Responsibility
//! - Diff the table as previously displayed against the table as edited,
//!   keyed by `code`, into modified and deleted row sets.
//!
//! # Invariants
//! - Unchanged rows appear in neither output.
//! - `code` is never treated as editable; a row with an unseen code is not
//!   an insert and is only flagged, because insertion flows exclusively
//!   through the freeform add path.

use crate::model::article::{Article, ArticleCode};
use log::warn;
use std::collections::{HashMap, HashSet};

/// Outcome of diffing an original snapshot against its edited version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Edited versions of rows present in both snapshots with at least one
    /// non-`code` field changed, in edited order.
    pub modified: Vec<Article>,
    /// Codes present in the original snapshot but absent from the edited
    /// one, in original order.
    pub deleted: Vec<ArticleCode>,
    /// Codes present only in the edited snapshot. Never persisted; callers
    /// decide how to surface them.
    pub unknown: Vec<ArticleCode>,
}

impl ReconcileOutcome {
    /// Whether the edit session changed nothing persistable.
    pub fn is_noop(&self) -> bool {
        self.modified.is_empty() && self.deleted.is_empty()
    }
}

/// Diffs two snapshots of the same table, keyed by `code`.
///
/// The caller is expected to submit snapshots whose codes are unique; the
/// validator enforces that contract on anything that gets persisted.
pub fn reconcile(original: &[Article], edited: &[Article]) -> ReconcileOutcome {
    let original_by_code: HashMap<&str, &Article> = original
        .iter()
        .map(|article| (article.code.as_str(), article))
        .collect();
    let edited_codes: HashSet<&str> = edited
        .iter()
        .map(|article| article.code.as_str())
        .collect();

    let deleted: Vec<ArticleCode> = original
        .iter()
        .filter(|article| !edited_codes.contains(article.code.as_str()))
        .map(|article| article.code.clone())
        .collect();

    let mut modified = Vec::new();
    let mut unknown = Vec::new();
    for row in edited {
        match original_by_code.get(row.code.as_str()) {
            Some(before) => {
                if *before != row {
                    modified.push(row.clone());
                }
            }
            None => unknown.push(row.code.clone()),
        }
    }

    if !unknown.is_empty() {
        warn!(
            "event=reconcile module=reconcile status=flagged unknown_codes={} detail=edited_rows_without_original",
            unknown.len()
        );
    }

    ReconcileOutcome {
        modified,
        deleted,
        unknown,
    }
}
