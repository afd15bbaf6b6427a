#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{AccountType, CategoryType, InvoiceStatus};
use crate::validate::parse_iso_date;

fn day(s: &str) -> NaiveDate {
    parse_iso_date(s).unwrap()
}

fn account(id: i64, name: &str, opening: Decimal) -> Account {
    let mut a = Account::new(name.into(), AccountType::Bank);
    a.id = Some(id);
    a.opening_balance = opening;
    a
}

fn category(id: i64, name: &str, color: &str, category_type: CategoryType) -> Category {
    let mut c = Category::new(name.into(), category_type);
    c.id = Some(id);
    c.color = color.into();
    c
}

fn txn(
    tx_type: TxType,
    account_id: i64,
    category_id: Option<i64>,
    date: &str,
    amount: Decimal,
) -> Transaction {
    let mut t = Transaction::new(tx_type, account_id, "x".into(), amount, date.into());
    t.category_id = category_id;
    t
}

fn transfer(from: i64, to: i64, date: &str, amount: Decimal) -> Transaction {
    let mut t = txn(TxType::Transfer, from, None, date, amount);
    t.to_account_id = Some(to);
    t
}

fn sample() -> (Vec<Account>, Vec<Category>, Vec<Transaction>) {
    let accounts = vec![account(1, "Inter", dec!(1000)), account(2, "Carteira", dec!(50))];
    let categories = vec![
        category(1, "Food", "#F59E0B", CategoryType::Expense),
        category(2, "Transport", "#3B82F6", CategoryType::Expense),
        category(7, "Salary", "#10B981", CategoryType::Income),
    ];
    let transactions = vec![
        txn(TxType::Income, 1, Some(7), "2025-01-05", dec!(5000)),
        txn(TxType::Expense, 1, Some(1), "2025-01-06", dec!(300)),
        txn(TxType::Expense, 2, Some(2), "2025-01-06", dec!(45.50)),
        txn(TxType::Expense, 1, None, "2025-01-20", dec!(20)),
        transfer(1, 2, "2025-01-10", dec!(100)),
        txn(TxType::Expense, 1, Some(1), "2024-12-28", dec!(200)),
    ];
    (accounts, categories, transactions)
}

// ── Balances ──────────────────────────────────────────────────

#[test]
fn test_account_balance() {
    let (accounts, _, txns) = sample();
    // 1000 + 5000 - 300 - 20 - 100 - 200
    assert_eq!(account_balance(&accounts[0], &txns), dec!(5380));
    // 50 - 45.50 + 100
    assert_eq!(account_balance(&accounts[1], &txns), dec!(104.50));
}

#[test]
fn test_total_balance_transfer_is_neutral() {
    let (accounts, _, txns) = sample();
    assert_eq!(total_balance(&accounts, &txns), dec!(5484.50));
}

#[test]
fn test_unsaved_account_balance_is_opening() {
    let a = Account::new("Nova".into(), AccountType::Cash);
    let (_, _, txns) = sample();
    assert_eq!(account_balance(&a, &txns), Decimal::ZERO);
}

#[test]
fn test_month_totals_exclude_transfers() {
    let (_, _, txns) = sample();
    assert_eq!(month_totals("2025-01", &txns), (dec!(5000), dec!(365.50)));
    assert_eq!(month_totals("2024-12", &txns), (dec!(0), dec!(200)));
    assert_eq!(month_totals("2025-03", &txns), (dec!(0), dec!(0)));
}

// ── Dashboard ─────────────────────────────────────────────────

#[test]
fn test_dashboard_stats() {
    let (accounts, categories, txns) = sample();
    let budgets = vec![
        Budget::new(1, "2025-01".into(), dec!(600)).unwrap(),
        Budget::new(2, "2025-01".into(), dec!(400)).unwrap(),
    ];
    let mut card = Card::new(2, "Nubank".into(), 15, 22, dec!(5000));
    card.id = Some(1);
    let cards = vec![card];
    let invoices = vec![CardInvoice {
        card_id: 1,
        reference_month: "2025-01".into(),
        status: InvoiceStatus::Closed,
        total: dec!(45.50),
    }];

    let snapshot = Snapshot {
        accounts: &accounts,
        categories: &categories,
        transactions: &txns,
        budgets: &budgets,
        cards: &cards,
        invoices: &invoices,
    };
    let stats = dashboard_stats(snapshot, day("2025-01-17"), 7).unwrap();
    assert_eq!(stats.month, "2025-01");
    assert_eq!(stats.total_balance, dec!(5484.50));
    assert_eq!(stats.month_income, dec!(5000));
    assert_eq!(stats.month_expense, dec!(365.50));
    // (300 + 45.50) / 1000
    assert_eq!(stats.budget_usage_percent, dec!(34.55));
    assert_eq!(stats.upcoming_bills.len(), 1);
    assert_eq!(stats.next_invoice_days, Some(5));
    let top: Vec<&str> = stats.top_expenses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(top, vec!["Food", "Transport", UNCATEGORIZED_NAME]);
}

#[test]
fn test_dashboard_stats_empty() {
    let snapshot = Snapshot {
        accounts: &[],
        categories: &[],
        transactions: &[],
        budgets: &[],
        cards: &[],
        invoices: &[],
    };
    let stats = dashboard_stats(snapshot, day("2025-01-17"), 7).unwrap();
    assert_eq!(stats.total_balance, Decimal::ZERO);
    assert_eq!(stats.budget_usage_percent, Decimal::ZERO);
    assert!(stats.upcoming_bills.is_empty());
    assert_eq!(stats.next_invoice_days, None);
    assert!(stats.top_expenses.is_empty());
}

// ── Balance chart ─────────────────────────────────────────────

#[test]
fn test_balance_chart_running_balance() {
    let (accounts, _, txns) = sample();
    let chart = balance_chart("2025-01", &accounts, &txns);
    assert_eq!(chart.len(), 31);
    // 1050 opening - 200 in December
    assert_eq!(chart[0].date, day("2025-01-01"));
    assert_eq!(chart[0].balance, dec!(850));
    assert_eq!(chart[4].balance, dec!(5850));
    assert_eq!(chart[5].balance, dec!(5504.50));
    // transfer on the 10th changes nothing overall
    assert_eq!(chart[9].balance, dec!(5504.50));
    assert_eq!(chart[30].balance, dec!(5484.50));
}

#[test]
fn test_balance_chart_february_length() {
    let chart = balance_chart("2024-02", &[], &[]);
    assert_eq!(chart.len(), 29);
    assert_eq!(chart.last().unwrap().date, day("2024-02-29"));
}

#[test]
fn test_balance_chart_bad_month() {
    assert!(balance_chart("2025-13", &[], &[]).is_empty());
}

// ── By category ───────────────────────────────────────────────

#[test]
fn test_expenses_by_category() {
    let (_, categories, txns) = sample();
    let rows = expenses_by_category("2025-01", &txns, &categories);
    let summary: Vec<(&str, Decimal)> = rows.iter().map(|r| (r.name.as_str(), r.amount)).collect();
    assert_eq!(
        summary,
        vec![("Food", dec!(300)), ("Transport", dec!(45.50)), ("Other", dec!(20))]
    );
    assert_eq!(rows[0].color, "#F59E0B");
    assert_eq!(rows[2].category_id, None);
    assert_eq!(rows[2].color, UNCATEGORIZED_COLOR);
}

#[test]
fn test_unknown_category_is_bucketed_as_other() {
    let txns = vec![
        txn(TxType::Expense, 1, Some(99), "2025-01-02", dec!(10)),
        txn(TxType::Expense, 1, None, "2025-01-03", dec!(5)),
    ];
    let rows = expenses_by_category("2025-01", &txns, &[]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, UNCATEGORIZED_NAME);
    assert_eq!(rows[0].amount, dec!(15));
}

#[test]
fn test_income_by_category() {
    let (_, categories, txns) = sample();
    let rows = income_by_category("2025-01", &txns, &categories);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Salary");
    assert_eq!(rows[0].amount, dec!(5000));
}

#[test]
fn test_by_category_empty_month() {
    let (_, categories, txns) = sample();
    assert!(expenses_by_category("2025-06", &txns, &categories).is_empty());
}

// ── Cash flow ─────────────────────────────────────────────────

#[test]
fn test_cash_flow_last_months() {
    let (_, _, txns) = sample();
    let rows = cash_flow("2025-01", 3, &txns);
    let months: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, vec!["2024-11", "2024-12", "2025-01"]);
    assert_eq!(rows[0].net, Decimal::ZERO);
    assert_eq!(rows[1].net, dec!(-200));
    assert_eq!(rows[2].income, dec!(5000));
    assert_eq!(rows[2].expense, dec!(365.50));
    assert_eq!(rows[2].net, dec!(4634.50));
}

#[test]
fn test_cash_flow_zero_months() {
    assert!(cash_flow("2025-01", 0, &[]).is_empty());
}
