use chrono::NaiveDate;
use stock_core::{reconcile, Article};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn widget() -> Article {
    Article::new("001", "Widget", date(2025, 3, 15), 10)
}

fn gadget() -> Article {
    Article::new("002", "Gadget", date(2025, 4, 1), 5)
}

#[test]
fn unchanged_snapshots_produce_empty_outputs() {
    let original = vec![widget(), gadget()];
    let outcome = reconcile(&original, &original.clone());
    assert!(outcome.modified.is_empty());
    assert!(outcome.deleted.is_empty());
    assert!(outcome.is_noop());
}

#[test]
fn removing_every_row_deletes_exactly_those_codes() {
    let outcome = reconcile(&[widget()], &[]);
    assert_eq!(outcome.deleted, vec!["001".to_string()]);
    assert!(outcome.modified.is_empty());
}

#[test]
fn removing_one_row_keeps_the_other_untouched() {
    let original = vec![widget(), gadget()];
    let edited = vec![widget()];
    let outcome = reconcile(&original, &edited);
    assert_eq!(outcome.deleted, vec!["002".to_string()]);
    assert!(outcome.modified.is_empty());
}

#[test]
fn quantity_change_yields_the_edited_version_keyed_by_code() {
    let original = vec![widget()];
    let edited = vec![Article::new("001", "Widget", date(2025, 3, 15), 20)];
    let outcome = reconcile(&original, &edited);
    assert!(outcome.deleted.is_empty());
    assert_eq!(outcome.modified, edited);
}

#[test]
fn every_non_code_field_participates_in_the_diff() {
    let original = vec![widget()];

    let renamed = vec![Article::new("001", "Widget XL", date(2025, 3, 15), 10)];
    assert_eq!(reconcile(&original, &renamed).modified, renamed);

    let postponed = vec![Article::new("001", "Widget", date(2025, 6, 30), 10)];
    assert_eq!(reconcile(&original, &postponed).modified, postponed);
}

#[test]
fn mixed_edit_session_splits_into_modified_and_deleted() {
    let original = vec![widget(), gadget()];
    let edited = vec![Article::new("001", "Widget", date(2025, 3, 15), 2)];
    let outcome = reconcile(&original, &edited);
    assert_eq!(outcome.modified.len(), 1);
    assert_eq!(outcome.modified[0].quantite, 2);
    assert_eq!(outcome.deleted, vec!["002".to_string()]);
    assert!(outcome.unknown.is_empty());
}

#[test]
fn brand_new_codes_are_flagged_and_never_persisted() {
    let original = vec![widget()];
    let edited = vec![widget(), Article::new("777", "Sprocket", date(2025, 5, 1), 4)];
    let outcome = reconcile(&original, &edited);
    assert!(outcome.modified.is_empty());
    assert!(outcome.deleted.is_empty());
    assert_eq!(outcome.unknown, vec!["777".to_string()]);
    assert!(outcome.is_noop());
}
