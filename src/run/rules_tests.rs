#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::models::{Account, AccountType, Transaction, TxType};

fn setup() -> (Database, i64) {
    let db = Database::open_in_memory().unwrap();
    let account_id = db
        .insert_account(&Account::new("Inter".into(), AccountType::Bank))
        .unwrap();
    (db, account_id)
}

fn category_id(db: &Database, name: &str) -> i64 {
    find_category(&db.get_categories().unwrap(), name)
        .unwrap()
        .id
        .unwrap()
}

#[test]
fn test_add_rule_by_category_name() {
    let (mut db, _) = setup();
    add(&mut db, "uber", "transport", 60).unwrap();
    let rules = db.get_rules().unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].category_id, category_id(&db, "Transport"));
    assert_eq!(rules[0].priority, 60);
}

#[test]
fn test_add_rule_rejects_short_pattern() {
    let (mut db, _) = setup();
    assert!(add(&mut db, "u", "Transport", 50).is_err());
    assert!(add(&mut db, "uber", "Transport", 101).is_err());
    assert!(db.get_rules().unwrap().is_empty());
}

#[test]
fn test_add_rule_unknown_category() {
    let (mut db, _) = setup();
    let err = add(&mut db, "uber", "Pets", 50).unwrap_err();
    assert!(err.to_string().contains("Unknown category"));
}

#[test]
fn test_edit_keeps_unchanged_fields() {
    let (mut db, _) = setup();
    add(&mut db, "uber", "Transport", 60).unwrap();
    let id = db.get_rules().unwrap()[0].id.unwrap();

    edit(&mut db, id, None, Some("Leisure".into()), None).unwrap();
    let rule = db.get_rule(id).unwrap().unwrap();
    assert_eq!(rule.contains, "uber");
    assert_eq!(rule.category_id, category_id(&db, "Leisure"));
    assert_eq!(rule.priority, 60);
}

#[test]
fn test_edit_unknown_rule() {
    let (mut db, _) = setup();
    assert!(edit(&mut db, 42, Some("ifood".into()), None, None).is_err());
}

#[test]
fn test_delete_unknown_rule() {
    let (mut db, _) = setup();
    assert!(delete(&mut db, 42).is_err());
}

#[test]
fn test_apply_categorizes_only_uncategorized() {
    let (mut db, account_id) = setup();
    let food = category_id(&db, "Food");
    let health = category_id(&db, "Health");
    add(&mut db, "ifood", "Food", 50).unwrap();

    let plain = Transaction::new(
        TxType::Expense,
        account_id,
        "IFOOD *Pizzaria".into(),
        dec!(59.90),
        "2025-01-10".into(),
    );
    let mut explicit = plain.clone();
    explicit.category_id = Some(health);
    let unmatched = Transaction::new(
        TxType::Expense,
        account_id,
        "Padaria".into(),
        dec!(12),
        "2025-01-11".into(),
    );
    for t in [&plain, &explicit, &unmatched] {
        db.insert_transaction(t).unwrap();
    }

    apply(&mut db).unwrap();

    let mut categories: Vec<Option<i64>> = db
        .get_all_transactions()
        .unwrap()
        .into_iter()
        .map(|t| t.category_id)
        .collect();
    categories.sort();
    let mut expected = vec![Some(food), Some(health), None];
    expected.sort();
    assert_eq!(categories, expected);
    assert_eq!(db.get_uncategorized_transactions().unwrap().len(), 1);
}
