//! Domain model for the perishable article catalog.
//!
//! # Responsibility
//! - Define the canonical article record and its fixed column schema.
//! - Provide the untyped table snapshot consumed by batch validation.
//!
//! # Invariants
//! - Every article is identified by a stable `code`; the code never changes
//!   after creation.
//! - Deletion is immediate and permanent; there is no tombstone state.

pub mod article;
pub mod table;
