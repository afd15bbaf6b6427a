#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::models::{Account, AccountType};

fn db_with_account() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.insert_account(&Account::new("Inter".into(), AccountType::Bank))
        .unwrap();
    db
}

fn rent(start: &str, end: Option<&str>) -> AddArgs {
    AddArgs {
        description: "Aluguel".into(),
        amount: "1.500,00".into(),
        tx_type: "expense".into(),
        account: None,
        to: None,
        category: Some("Housing".into()),
        freq: "monthly".into(),
        start: Some(start.into()),
        end: end.map(String::from),
    }
}

#[test]
fn test_add_stores_template() {
    let mut db = db_with_account();
    add(&mut db, &Settings::default(), rent("2024-01-31", None)).unwrap();

    let recs = db.get_recurrences().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].freq, Frequency::Monthly);
    assert_eq!(recs[0].next_run_at, "2024-01-31");
    assert_eq!(recs[0].template.amount, dec!(1500));
    assert!(recs[0].template.category_id.is_some());
}

#[test]
fn test_add_rejects_bad_frequency() {
    let mut db = db_with_account();
    let mut args = rent("2024-01-01", None);
    args.freq = "daily".into();
    assert!(add(&mut db, &Settings::default(), args).is_err());
}

#[test]
fn test_add_rejects_end_before_start() {
    let mut db = db_with_account();
    let args = rent("2024-03-01", Some("2024-02-01"));
    assert!(add(&mut db, &Settings::default(), args).is_err());
}

#[test]
fn test_run_records_due_occurrences_once() {
    let mut db = db_with_account();
    add(&mut db, &Settings::default(), rent("2024-01-31", None)).unwrap();

    run(&mut db, Some("2024-03-31".into())).unwrap();
    let mut dates: Vec<String> = db
        .get_all_transactions()
        .unwrap()
        .into_iter()
        .map(|t| t.date)
        .collect();
    dates.sort();
    assert_eq!(dates, vec!["2024-01-31", "2024-02-29", "2024-03-31"]);
    assert_eq!(db.get_recurrences().unwrap()[0].next_run_at, "2024-04-30");

    // Running again for the same date records nothing new
    run(&mut db, Some("2024-03-31".into())).unwrap();
    assert_eq!(db.get_all_transactions().unwrap().len(), 3);
}

#[test]
fn test_run_stops_at_end_date() {
    let mut db = db_with_account();
    add(
        &mut db,
        &Settings::default(),
        rent("2024-01-10", Some("2024-02-15")),
    )
    .unwrap();

    run(&mut db, Some("2024-06-30".into())).unwrap();
    assert_eq!(db.get_all_transactions().unwrap().len(), 2);
}
