#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::{InvalidBudgetError, InvalidRuleError, InvoiceError, PurchaseError};

// ── Transaction ───────────────────────────────────────────────

fn make_txn(tx_type: TxType, amount: Decimal) -> Transaction {
    Transaction::new(tx_type, 1, "Test".into(), amount, "2025-01-15".into())
}

#[test]
fn test_tx_type_parse() {
    assert_eq!(TxType::parse("expense"), Some(TxType::Expense));
    assert_eq!(TxType::parse("DESPESA"), Some(TxType::Expense));
    assert_eq!(TxType::parse("receita"), Some(TxType::Income));
    assert_eq!(TxType::parse("transfer"), Some(TxType::Transfer));
    assert_eq!(TxType::parse("refund"), None);
}

#[test]
fn test_tx_type_roundtrip() {
    for t in [TxType::Expense, TxType::Income, TxType::Transfer] {
        assert_eq!(TxType::parse(t.as_str()), Some(t));
    }
}

#[test]
fn test_transfers_are_not_categorized() {
    assert!(TxType::Expense.is_categorized());
    assert!(TxType::Income.is_categorized());
    assert!(!TxType::Transfer.is_categorized());
}

#[test]
fn test_transaction_month() {
    let txn = make_txn(TxType::Expense, dec!(10));
    assert_eq!(txn.month(), "2025-01");
    assert!(txn.in_month("2025-01"));
    assert!(!txn.in_month("2025-02"));
}

#[test]
fn test_transaction_month_short_date() {
    let mut txn = make_txn(TxType::Expense, dec!(10));
    txn.date = "2025".into();
    assert_eq!(txn.month(), "");
    assert!(!txn.in_month("2025-01"));
}

#[test]
fn test_balance_effect() {
    let expense = make_txn(TxType::Expense, dec!(40));
    let income = make_txn(TxType::Income, dec!(100));
    let mut transfer = make_txn(TxType::Transfer, dec!(25));
    transfer.to_account_id = Some(2);

    assert_eq!(expense.balance_effect(1), dec!(-40));
    assert_eq!(income.balance_effect(1), dec!(100));
    assert_eq!(transfer.balance_effect(1), dec!(-25));
    assert_eq!(transfer.balance_effect(2), dec!(25));
    assert_eq!(expense.balance_effect(2), Decimal::ZERO);
}

#[test]
fn test_payment_method_parse() {
    assert_eq!(PaymentMethod::parse("PIX"), Some(PaymentMethod::Pix));
    assert_eq!(PaymentMethod::parse("credit"), Some(PaymentMethod::Credit));
    assert_eq!(PaymentMethod::parse("boleto"), None);
}

// ── AccountType ───────────────────────────────────────────────

#[test]
fn test_account_type_parse() {
    assert_eq!(AccountType::parse("bank"), Some(AccountType::Bank));
    assert_eq!(AccountType::parse("Checking"), Some(AccountType::Bank));
    assert_eq!(AccountType::parse("wallet"), Some(AccountType::Wallet));
    assert_eq!(AccountType::parse("credit card"), Some(AccountType::Card));
    assert_eq!(AccountType::parse("CASH"), Some(AccountType::Cash));
    assert_eq!(AccountType::parse("crypto"), None);
}

#[test]
fn test_account_type_roundtrip() {
    for t in AccountType::all() {
        assert_eq!(AccountType::parse(t.as_str()), Some(*t), "Roundtrip failed for {t}");
    }
}

#[test]
fn test_account_new_defaults() {
    let account = Account::new("Nubank".into(), AccountType::Card);
    assert!(account.id.is_none());
    assert_eq!(account.currency, "BRL");
    assert_eq!(account.opening_balance, Decimal::ZERO);
    assert!(!account.created_at.is_empty());
}

#[test]
fn test_account_find_by_name() {
    let mut a = Account::new("Banco Inter".into(), AccountType::Bank);
    a.id = Some(7);
    let accounts = vec![a];
    assert_eq!(Account::find_by_name(&accounts, "banco inter").and_then(|a| a.id), Some(7));
    assert!(Account::find_by_name(&accounts, "Nubank").is_none());
    assert!(Account::find_by_id(&accounts, 7).is_some());
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_new() {
    let cat = Category::new("Food".into(), CategoryType::Expense);
    assert!(cat.id.is_none());
    assert!(cat.parent_id.is_none());
    assert!(cat.icon.is_empty());
    assert!(cat.color.is_empty());
}

#[test]
fn test_category_display_with_icon() {
    let mut cat = Category::new("Food".into(), CategoryType::Expense);
    assert_eq!(format!("{cat}"), "Food");
    cat.icon = "🍽️".into();
    assert_eq!(format!("{cat}"), "🍽️ Food");
}

#[test]
fn test_category_type_parse() {
    assert_eq!(CategoryType::parse("receita"), Some(CategoryType::Income));
    assert_eq!(CategoryType::parse("expense"), Some(CategoryType::Expense));
    assert_eq!(CategoryType::parse("other"), None);
}

// ── Budget ────────────────────────────────────────────────────

#[test]
fn test_budget_new() {
    let budget = Budget::new(1, "2025-01".into(), dec!(800)).unwrap();
    assert!(budget.id.is_none());
    assert_eq!(budget.category_id, 1);
    assert_eq!(budget.month, "2025-01");
    assert_eq!(budget.limit_amount, dec!(800));
}

#[test]
fn test_budget_rejects_zero_limit() {
    let err = Budget::new(1, "2025-01".into(), Decimal::ZERO).unwrap_err();
    assert_eq!(err, InvalidBudgetError::LimitTooSmall(Decimal::ZERO));
}

#[test]
fn test_budget_rejects_negative_limit() {
    assert!(Budget::new(1, "2025-01".into(), dec!(-5)).is_err());
}

#[test]
fn test_budget_limit_below_a_cent() {
    let err = Budget::new(1, "2025-01".into(), dec!(0.0000001)).unwrap_err();
    assert_eq!(err, InvalidBudgetError::LimitTooSmall(dec!(0.0000001)));
    // 0.004 rounds down to zero, 0.005 rounds up to a cent
    assert!(Budget::new(1, "2025-01".into(), dec!(0.004)).is_err());
    let budget = Budget::new(1, "2025-01".into(), dec!(0.005)).unwrap();
    assert_eq!(budget.limit_amount, dec!(0.01));
}

#[test]
fn test_budget_limit_too_large() {
    let err = Budget::new(1, "2025-01".into(), dec!(1000000000000)).unwrap_err();
    assert!(matches!(err, InvalidBudgetError::LimitTooLarge(_)));
}

#[test]
fn test_budget_rejects_bad_month() {
    let err = Budget::new(1, "2025-13".into(), dec!(10)).unwrap_err();
    assert_eq!(err, InvalidBudgetError::InvalidMonth("2025-13".into()));
    assert!(Budget::new(1, "2025-1".into(), dec!(10)).is_err());
}

// ── Rule ──────────────────────────────────────────────────────

#[test]
fn test_rule_new() {
    let rule = Rule::new("  uber ", 2, 50).unwrap();
    assert!(rule.id.is_none());
    assert_eq!(rule.contains, "uber");
    assert_eq!(rule.category_id, 2);
    assert_eq!(rule.priority, 50);
}

#[test]
fn test_rule_pattern_too_short() {
    let err = Rule::new("a", 1, 50).unwrap_err();
    assert_eq!(err, InvalidRuleError::PatternTooShort { len: 1, min: 2 });
    // Whitespace does not count towards the minimum
    assert!(Rule::new(" a ", 1, 50).is_err());
    assert!(Rule::new("", 1, 50).is_err());
}

#[test]
fn test_rule_pattern_counts_chars_not_bytes() {
    assert!(Rule::new("é", 1, 50).is_err());
    assert!(Rule::new("pé", 1, 50).is_ok());
}

#[test]
fn test_rule_priority_bounds() {
    assert!(Rule::new("ab", 1, 1).is_ok());
    assert!(Rule::new("ab", 1, 100).is_ok());
    assert_eq!(
        Rule::new("ab", 1, 0).unwrap_err(),
        InvalidRuleError::PriorityOutOfRange(0)
    );
    assert_eq!(
        Rule::new("ab", 1, 101).unwrap_err(),
        InvalidRuleError::PriorityOutOfRange(101)
    );
}

#[test]
fn test_rule_edit_keeps_id() {
    let mut rule = Rule::new("uber", 2, 10).unwrap();
    rule.id = Some(5);
    rule.edit("99 taxi", 3, 80).unwrap();
    assert_eq!(rule.id, Some(5));
    assert_eq!(rule.contains, "99 taxi");
    assert_eq!(rule.category_id, 3);
    assert_eq!(rule.priority, 80);
}

#[test]
fn test_rule_edit_invalid_leaves_rule_untouched() {
    let mut rule = Rule::new("uber", 2, 10).unwrap();
    assert!(rule.edit("x", 3, 80).is_err());
    assert!(rule.edit("taxi", 3, 500).is_err());
    assert_eq!(rule.contains, "uber");
    assert_eq!(rule.priority, 10);
}

// ── Card invoices ─────────────────────────────────────────────

#[test]
fn test_invoice_status_transitions() {
    assert_eq!(InvoiceStatus::Open.close(), Ok(InvoiceStatus::Closed));
    assert_eq!(InvoiceStatus::Closed.pay(), Ok(InvoiceStatus::Paid));
}

#[test]
fn test_invoice_status_illegal_transitions() {
    assert_eq!(
        InvoiceStatus::Open.pay(),
        Err(InvoiceError::NotClosed(InvoiceStatus::Open))
    );
    assert_eq!(
        InvoiceStatus::Paid.close(),
        Err(InvoiceError::NotOpen(InvoiceStatus::Paid))
    );
    assert!(InvoiceStatus::Paid.pay().is_err());
}

#[test]
fn test_invoice_status_roundtrip() {
    for s in [InvoiceStatus::Open, InvoiceStatus::Closed, InvoiceStatus::Paid] {
        assert_eq!(InvoiceStatus::parse(s.as_str()), Some(s));
    }
}

// ── Purchase ──────────────────────────────────────────────────

fn item(name: &str, qty: u32, price: Decimal) -> PurchaseItem {
    PurchaseItem {
        id: None,
        item_name: name.into(),
        qty,
        unit_price: price,
    }
}

#[test]
fn test_purchase_estimated_total() {
    let p = Purchase::new(
        3,
        Some("2025-02-15".into()),
        vec![item("Cadeira", 2, dec!(150.00)), item("Mesa", 1, dec!(150.50))],
    );
    assert_eq!(p.status, PurchaseStatus::Requested);
    assert_eq!(p.total_estimated, dec!(450.50));
    assert!(p.total_real.is_none());
}

#[test]
fn test_purchase_advance_through_workflow() {
    let mut p = Purchase::new(1, None, vec![item("Papel", 10, dec!(2))]);
    assert_eq!(p.advance("2025-01-22").unwrap(), PurchaseStatus::Received);
    assert_eq!(p.received_date.as_deref(), Some("2025-01-22"));
    assert_eq!(p.advance("2025-01-25").unwrap(), PurchaseStatus::Invoiced);
    assert_eq!(p.advance("2025-01-30").unwrap(), PurchaseStatus::Paid);
    // Received date is not overwritten by later steps
    assert_eq!(p.received_date.as_deref(), Some("2025-01-22"));
}

#[test]
fn test_purchase_paid_is_final() {
    let mut p = Purchase::new(1, None, vec![item("Papel", 1, dec!(2))]);
    p.status = PurchaseStatus::Paid;
    assert_eq!(
        p.advance("2025-01-01").unwrap_err(),
        PurchaseError::AlreadyFinal(PurchaseStatus::Paid)
    );
}

// ── Vendor ────────────────────────────────────────────────────

#[test]
fn test_vendor_search() {
    let vendors: Vec<Vendor> = ["Uber", "iFood", "Amazon", "Mercado Livre"]
        .iter()
        .enumerate()
        .map(|(i, n)| Vendor {
            id: Some(i as i64 + 1),
            name: n.to_string(),
            cnpj: None,
        })
        .collect();
    let found: Vec<&str> = Vendor::search(&vendors, "IFO").iter().map(|v| v.name.as_str()).collect();
    assert_eq!(found, vec!["iFood"]);
    assert_eq!(Vendor::search(&vendors, "").len(), 4);
    assert!(Vendor::search(&vendors, "netflix").is_empty());
}

// ── Frequency ─────────────────────────────────────────────────

#[test]
fn test_frequency_parse() {
    assert_eq!(Frequency::parse("Monthly"), Some(Frequency::Monthly));
    assert_eq!(Frequency::parse("weekly"), Some(Frequency::Weekly));
    assert_eq!(Frequency::parse("daily"), None);
}
