//! Core domain logic for the perishable stock manager.
//! This crate is the single source of truth for catalog invariants.

pub mod logging;
pub mod model;
pub mod notify;
pub mod parse;
pub mod reconcile;
pub mod search;
pub mod service;
pub mod store;
pub mod validate;

pub use logging::{default_log_level, init_logging};
pub use model::article::{column_names, Article, ArticleCode, FieldType, DATE_FORMAT, SCHEMA};
pub use model::table::RawTable;
pub use notify::{MailerConfig, NotifyError, NotifyResult, SmtpNotifier};
pub use parse::{parse_articles, MalformedCause, ParseError, ParseResult};
pub use reconcile::{reconcile, ReconcileOutcome};
pub use search::{filter_articles, month_end, month_start, SearchCriteria};
pub use service::{SaveReport, StockService, StockServiceError};
pub use store::{ArticleStore, CsvStore, MemoryStore, StoreError, StoreResult};
pub use validate::{validate_articles, validate_table, ValidateResult, ValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
