use chrono::NaiveDate;
use stock_core::{
    Article, CsvStore, MemoryStore, ParseError, SearchCriteria, StockService,
    StockServiceError, ValidationError,
};
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

#[test]
fn add_then_search_then_edit_flow_over_the_flat_file_backend() {
    let dir = TempDir::new().expect("temp dir");
    let service = StockService::new(CsvStore::new(dir.path().join("db.csv")));

    // add: freeform text becomes two validated, insertable rows
    let inserted = service
        .add_articles("001,Widget,2025-03-15,10\n002,Gadget,2025-04-01,5")
        .expect("two valid lines insert");
    assert_eq!(inserted.len(), 2);

    // search: range window starting 2025-03-01 keeps only the March row
    let criteria = SearchCriteria {
        code: "00".to_string(),
        designation: String::new(),
        expiry: Some(date(2025, 3, 1)),
    };
    let displayed = service.search(&criteria).expect("search succeeds");
    assert_eq!(displayed.len(), 1);
    assert_eq!(displayed[0].code, "001");

    // edit: bump the quantity of the displayed row
    let edited = vec![Article::new("001", "Widget", date(2025, 3, 15), 20)];
    let report = service
        .save_edits(&displayed, &edited)
        .expect("edit session persists");
    assert_eq!(report.updated, 1);
    assert_eq!(report.deleted, 0);

    let all = service
        .search(&SearchCriteria::default())
        .expect("search succeeds");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].quantite, 20);
}

#[test]
fn deleting_the_displayed_row_removes_it_from_the_store() {
    let store = MemoryStore::with_articles(vec![Article::new(
        "001",
        "Widget",
        date(2025, 3, 15),
        10,
    )]);
    let service = StockService::new(store);

    let displayed = service
        .search(&SearchCriteria::default())
        .expect("search succeeds");
    let report = service
        .save_edits(&displayed, &[])
        .expect("deletion persists");
    assert_eq!(report.deleted, 1);
    assert_eq!(report.updated, 0);

    assert!(service
        .search(&SearchCriteria::default())
        .expect("search succeeds")
        .is_empty());
}

#[test]
fn noop_edit_session_touches_nothing() {
    let store = MemoryStore::with_articles(vec![Article::new(
        "001",
        "Widget",
        date(2025, 3, 15),
        10,
    )]);
    let service = StockService::new(store);

    let displayed = service
        .search(&SearchCriteria::default())
        .expect("search succeeds");
    let report = service
        .save_edits(&displayed, &displayed.clone())
        .expect("noop session succeeds");
    assert_eq!(report.updated, 0);
    assert_eq!(report.deleted, 0);
}

#[test]
fn invalid_edit_batch_aborts_before_any_store_call() {
    let store = MemoryStore::with_articles(vec![Article::new(
        "001",
        "Widget",
        date(2025, 3, 15),
        10,
    )]);
    let service = StockService::new(store);

    let displayed = service
        .search(&SearchCriteria::default())
        .expect("search succeeds");
    let edited = vec![Article::new("001", "Widget", date(2025, 3, 15), -5)];
    let error = service
        .save_edits(&displayed, &edited)
        .expect_err("negative quantity rejected");
    assert!(matches!(
        error,
        StockServiceError::Validation(ValidationError::NegativeQuantity)
    ));

    // the store still holds the original row
    let rows = service
        .search(&SearchCriteria::default())
        .expect("search succeeds");
    assert_eq!(rows[0].quantite, 10);
}

#[test]
fn adding_a_code_already_in_the_store_is_rejected() {
    let store = MemoryStore::with_articles(vec![Article::new(
        "001",
        "Widget",
        date(2025, 3, 15),
        10,
    )]);
    let service = StockService::new(store);

    let error = service
        .add_articles("001,Duplicate,2025-05-01,3")
        .expect_err("live-collection duplicate rejected");
    assert!(matches!(
        error,
        StockServiceError::Validation(ValidationError::DuplicateCode)
    ));
    assert_eq!(
        service
            .search(&SearchCriteria::default())
            .expect("search succeeds")
            .len(),
        1
    );
}

#[test]
fn malformed_add_input_reaches_the_caller_as_a_parse_error() {
    let service = StockService::new(MemoryStore::new());
    let error = service
        .add_articles("001,Widget,2025-03-15")
        .expect_err("short record rejected");
    assert!(matches!(
        error,
        StockServiceError::Parse(ParseError::Malformed { .. })
    ));

    let empty = service.add_articles("   ").expect_err("blank input rejected");
    assert!(matches!(
        empty,
        StockServiceError::Parse(ParseError::EmptyInput)
    ));
}

#[test]
fn flagged_new_codes_survive_into_the_save_report() {
    let store = MemoryStore::with_articles(vec![Article::new(
        "001",
        "Widget",
        date(2025, 3, 15),
        10,
    )]);
    let service = StockService::new(store);

    let displayed = service
        .search(&SearchCriteria::default())
        .expect("search succeeds");
    let mut edited = displayed.clone();
    edited.push(Article::new("777", "Sprocket", date(2025, 5, 1), 4));

    let report = service
        .save_edits(&displayed, &edited)
        .expect("session succeeds");
    assert_eq!(report.ignored_new_codes, vec!["777".to_string()]);
    assert_eq!(
        service
            .search(&SearchCriteria::default())
            .expect("search succeeds")
            .len(),
        1
    );
}
