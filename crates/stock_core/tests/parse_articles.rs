use chrono::NaiveDate;
use stock_core::{
    parse_articles, validate_table, Article, MalformedCause, ParseError, RawTable,
    ValidationError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

#[test]
fn empty_input_gets_its_dedicated_prompt() {
    let error = parse_articles("").expect_err("empty input rejected");
    assert!(matches!(error, ParseError::EmptyInput));
    assert_eq!(error.to_string(), "enter at least one article to add");
}

#[test]
fn two_line_input_parses_into_two_insertable_rows() {
    let rows = parse_articles("001,Widget,2025-03-15,10\n002,Gadget,2025-04-01,5")
        .expect("two valid lines parse");
    assert_eq!(
        rows,
        vec![
            Article::new("001", "Widget", date(2025, 3, 15), 10),
            Article::new("002", "Gadget", date(2025, 4, 1), 5),
        ]
    );
}

#[test]
fn blank_lines_between_records_are_ignored() {
    let rows = parse_articles("001,Widget,2025-03-15,10\n\n002,Gadget,2025-04-01,5\n")
        .expect("blank lines are skipped");
    assert_eq!(rows.len(), 2);
}

#[test]
fn wrong_field_count_collapses_to_the_help_message() {
    let error = parse_articles("001,Widget,2025-03-15").expect_err("three fields rejected");
    match &error {
        ParseError::Malformed {
            cause: MalformedCause::FieldCount { found, .. },
        } => assert_eq!(*found, 3),
        other => panic!("unexpected error: {other:?}"),
    }
    let message = error.to_string();
    assert!(message.contains("code, designation, dlc, quantite"));
    assert!(message.contains("001,Article 1,2022-12-31,10"));
    assert!(message.contains("003,Article 3,2023-02-28,30"));
}

#[test]
fn unparseable_date_is_reported_with_the_same_message_as_validation() {
    let bad_date = parse_articles("001,Widget,tomorrow,10").expect_err("bad date rejected");
    let duplicate =
        parse_articles("001,A,2025-03-15,1\n001,B,2025-03-16,2").expect_err("duplicate rejected");
    assert_eq!(bad_date.to_string(), duplicate.to_string());

    match bad_date {
        ParseError::Malformed {
            cause: MalformedCause::Invalid(ValidationError::ColumnType { column, .. }),
        } => assert_eq!(column, "dlc"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_cell_fails_as_missing_value() {
    let error = parse_articles("001,,2025-03-15,10").expect_err("empty designation rejected");
    assert!(matches!(
        error,
        ParseError::Malformed {
            cause: MalformedCause::Invalid(ValidationError::MissingValue),
        }
    ));
}

#[test]
fn serialized_rows_round_trip_through_parse_and_validate() {
    let rows = vec![
        Article::new("001", "Widget", date(2025, 3, 15), 10),
        Article::new("002", "Gadget", date(2025, 4, 1), 5),
    ];

    let text = rows
        .iter()
        .map(|article| article.to_cells().join(","))
        .collect::<Vec<_>>()
        .join("\n");
    let reparsed = parse_articles(&text).expect("serialized rows parse back");
    assert_eq!(reparsed, rows);

    let table = RawTable::from_articles(&reparsed);
    let revalidated = validate_table(&table).expect("round-tripped rows stay valid");
    assert_eq!(revalidated, rows);
}
