//! Criteria-based article search and filtering.
//!
//! # Responsibility
//! - Match articles against code/designation substrings and an expiry
//!   window.
//! - Keep results stably sorted ascending by expiry date.
//!
//! # Invariants
//! - Substring matching is case-insensitive; an empty substring matches
//!   every row.
//! - The expiry filter keeps rows inside `[reference, end of reference's
//!   month]` inclusive (range semantics; the day-of-month variant seen in
//!   one historical deployment is intentionally not supported).
//! - Zero matches yield an empty vector, never an error.

use crate::model::article::Article;
use chrono::{Datelike, NaiveDate};
use regex::{Regex, RegexBuilder};

/// Search criteria for one user interaction.
///
/// Empty substrings and an absent reference date each disable their
/// respective filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Case-insensitive substring matched against `code`.
    pub code: String,
    /// Case-insensitive substring matched against `designation`.
    pub designation: String,
    /// Start of the expiry window; the window closes at that month's end.
    pub expiry: Option<NaiveDate>,
}

impl SearchCriteria {
    /// Compiles the criteria into a reusable matcher.
    pub fn matcher(&self) -> CriteriaMatcher {
        CriteriaMatcher {
            code: substring_regex(&self.code),
            designation: substring_regex(&self.designation),
            window: self.expiry.map(|reference| (reference, month_end(reference))),
        }
    }
}

/// Compiled form of [`SearchCriteria`], built once per query.
#[derive(Debug)]
pub struct CriteriaMatcher {
    code: Regex,
    designation: Regex,
    window: Option<(NaiveDate, NaiveDate)>,
}

impl CriteriaMatcher {
    /// Whether one article satisfies every active filter.
    pub fn matches(&self, article: &Article) -> bool {
        if !self.code.is_match(&article.code) {
            return false;
        }
        if !self.designation.is_match(&article.designation) {
            return false;
        }
        match self.window {
            Some((start, end)) => start <= article.dlc && article.dlc <= end,
            None => true,
        }
    }
}

/// Case-insensitive substring match expressed as an escaped regex, the
/// direct port of a `$regex` + `"i"` document query.
fn substring_regex(substring: &str) -> Regex {
    RegexBuilder::new(&regex::escape(substring.trim()))
        .case_insensitive(true)
        .build()
        .expect("escaped pattern always compiles")
}

/// Filters a row set by criteria and sorts matches ascending by expiry.
///
/// The sort is stable, so rows sharing an expiry date keep their input
/// order.
pub fn filter_articles(articles: &[Article], criteria: &SearchCriteria) -> Vec<Article> {
    let matcher = criteria.matcher();
    let mut matched: Vec<Article> = articles
        .iter()
        .filter(|article| matcher.matches(article))
        .cloned()
        .collect();
    matched.sort_by_key(|article| article.dlc);
    matched
}

/// First day of the given date's month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 exists in every month")
}

/// Last day of the given date's month.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("first day of month is always valid")
        .pred_opt()
        .expect("predecessor of a first-of-month exists")
}
