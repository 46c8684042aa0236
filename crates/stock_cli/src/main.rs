//! Stock management CLI.
//!
//! # Responsibility
//! - Drive the core search/add/edit/report flows, one interaction per
//!   invocation.
//! - Surface user-facing error messages and exit non-zero on failure.
//!
//! # Invariants
//! - The store handle is built once per invocation and passed down
//!   explicitly; there is no process-global connection state.
//! - A failed interaction prints its message and changes nothing else.

mod config;

use chrono::{Local, NaiveDate};
use config::CliConfig;
use log::error;
use std::fs::File;
use std::io::Read;
use stock_core::{
    init_logging, month_start, validate_table, Article, CsvStore, RawTable, SearchCriteria,
    SmtpNotifier, StockService, DATE_FORMAT,
};

const USAGE: &str = "usage: stock <command> [options]

commands:
  search [--code S] [--designation S] [--expiry YYYY-MM-DD] [--all-dates]
      list matching articles (default expiry window starts at the first
      day of the current month)
  add
      read comma-separated articles from stdin and insert them
  edit <edited.csv> [search options]
      apply an edited table against the current match set
  report [search options]
      email the matching articles (requires mail configuration)
  version
      print the core version";

fn main() {
    match run() {
        Ok(()) => {}
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        return Err(USAGE.to_string());
    };

    if command == "version" {
        println!("stock_core {}", stock_core::core_version());
        return Ok(());
    }

    let config = CliConfig::from_env();
    init_logging(&config.log_level, &config.log_dir)?;

    let store = CsvStore::new(&config.store_path);
    let service = StockService::new(store);

    match command.as_str() {
        "search" => {
            let criteria = parse_criteria(&args[1..])?;
            let rows = service.search(&criteria).map_err(user_message)?;
            print_table(&rows);
            println!("{} article(s) found", rows.len());
            Ok(())
        }
        "add" => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("cannot read input: {err}"))?;
            let inserted = service.add_articles(&text).map_err(user_message)?;
            print_table(&inserted);
            println!("{} article(s) added", inserted.len());
            Ok(())
        }
        "edit" => {
            let Some(edited_path) = args.get(1) else {
                return Err(USAGE.to_string());
            };
            let criteria = parse_criteria(&args[2..])?;
            let original = service.search(&criteria).map_err(user_message)?;
            let edited = read_edited_table(edited_path)?;
            let report = service
                .save_edits(&original, &edited)
                .map_err(user_message)?;
            for code in &report.ignored_new_codes {
                eprintln!("warning: code `{code}` is not in the current match set; use `add` to insert new articles");
            }
            println!(
                "{} article(s) updated, {} article(s) deleted",
                report.updated, report.deleted
            );
            Ok(())
        }
        "report" => {
            let criteria = parse_criteria(&args[1..])?;
            let mail = config
                .mail
                .as_ref()
                .ok_or_else(|| "mail is not configured; set the STOCK_SMTP_* and STOCK_MAIL_* variables".to_string())?;
            let rows = service.search(&criteria).map_err(user_message)?;
            let notifier = SmtpNotifier::new(mail).map_err(user_message)?;
            notifier
                .send_stock_report(&rows, today())
                .map_err(user_message)?;
            println!("report with {} article(s) sent", rows.len());
            Ok(())
        }
        _ => Err(USAGE.to_string()),
    }
}

/// Parses `--code/--designation/--expiry/--all-dates` search options.
///
/// The expiry reference defaults to the first day of the current month,
/// like the original search form; `--all-dates` disables the window.
fn parse_criteria(args: &[String]) -> Result<SearchCriteria, String> {
    let mut criteria = SearchCriteria {
        expiry: Some(month_start(today())),
        ..SearchCriteria::default()
    };

    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--code" => {
                criteria.code = option_value(args, index)?;
                index += 2;
            }
            "--designation" => {
                criteria.designation = option_value(args, index)?;
                index += 2;
            }
            "--expiry" => {
                let value = option_value(args, index)?;
                let date = NaiveDate::parse_from_str(&value, DATE_FORMAT)
                    .map_err(|_| format!("invalid --expiry date `{value}`; expected YYYY-MM-DD"))?;
                criteria.expiry = Some(date);
                index += 2;
            }
            "--all-dates" => {
                criteria.expiry = None;
                index += 1;
            }
            other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
        }
    }
    Ok(criteria)
}

fn option_value(args: &[String], index: usize) -> Result<String, String> {
    args.get(index + 1)
        .cloned()
        .ok_or_else(|| format!("option `{}` expects a value", args[index]))
}

/// Reads and whole-batch-validates an edited table from a headered CSV
/// file.
fn read_edited_table(path: &str) -> Result<Vec<Article>, String> {
    let file = File::open(path).map_err(|err| format!("cannot open `{path}`: {err}"))?;
    let table = RawTable::from_csv_reader(file)
        .map_err(|err| format!("cannot read `{path}`: {err}"))?;
    validate_table(&table).map_err(|err| err.to_string())
}

fn print_table(rows: &[Article]) {
    println!("{:<12} {:<32} {:<12} {:>8}", "code", "designation", "dlc", "quantite");
    for article in rows {
        println!(
            "{:<12} {:<32} {:<12} {:>8}",
            article.code,
            article.designation,
            article.dlc.format(DATE_FORMAT).to_string(),
            article.quantite
        );
    }
}

fn user_message(err: impl std::error::Error) -> String {
    if let Some(source) = err.source() {
        error!("event=interaction module=cli status=error error={source}");
    } else {
        error!("event=interaction module=cli status=error error={err}");
    }
    err.to_string()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
