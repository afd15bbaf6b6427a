//! Creation-boundary validation. Each function takes the raw values a user
//! typed and either builds the model or reports every field that is wrong.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

use crate::error::{FieldErrors, InvalidRuleError};
use crate::models::*;
use crate::money::{format_amount, parse_amount, MAX_AMOUNT, MIN_AMOUNT};

#[allow(clippy::expect_used)]
static MONTH_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").expect("month regex"));

#[allow(clippy::expect_used)]
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex"));

/// `"YYYY-MM"` with a real month number.
pub(crate) fn is_month_key(s: &str) -> bool {
    MONTH_KEY.is_match(s)
}

/// Strict `YYYY-MM-DD` that is also a real calendar date.
pub(crate) fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if !ISO_DATE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

// ── Transactions ─────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub(crate) struct TransactionDraft {
    pub(crate) tx_type: String,
    pub(crate) amount: String,
    pub(crate) date: String,
    pub(crate) description: String,
    pub(crate) account_id: Option<i64>,
    pub(crate) to_account_id: Option<i64>,
    pub(crate) category_id: Option<i64>,
    pub(crate) vendor_id: Option<i64>,
    pub(crate) payment_method: Option<String>,
    pub(crate) installments: Option<u32>,
    pub(crate) notes: String,
}

/// A transaction ready to store, plus how many installments to split it into.
#[derive(Debug, Clone)]
pub(crate) struct ValidTransaction {
    pub(crate) txn: Transaction,
    pub(crate) installments: u32,
}

pub(crate) fn transaction(draft: &TransactionDraft) -> Result<ValidTransaction, FieldErrors> {
    let mut errs = FieldErrors::default();

    let tx_type = TxType::parse(&draft.tx_type);
    if tx_type.is_none() {
        errs.push("type", "Type must be expense, income or transfer");
    }

    let amount = match parse_amount(&draft.amount) {
        None if draft.amount.trim().is_empty() => {
            errs.push("amount", "Amount is required");
            Decimal::ZERO
        }
        None => {
            errs.push("amount", "Amount must be a number with at most two decimals");
            Decimal::ZERO
        }
        Some(a) if a <= Decimal::ZERO => {
            errs.push("amount", "Amount must be greater than zero");
            Decimal::ZERO
        }
        Some(a) if a > MAX_AMOUNT => {
            errs.push("amount", too_large("Amount"));
            Decimal::ZERO
        }
        Some(a) => a,
    };

    if parse_iso_date(draft.date.trim()).is_none() {
        errs.push("date", "Date must be a valid YYYY-MM-DD date");
    }

    let description = draft.description.trim();
    if description.is_empty() {
        errs.push("description", "Description is required");
    }

    if draft.account_id.is_none() {
        errs.push("account", "Account is required");
    }

    let payment_method = match draft.payment_method.as_deref() {
        None => None,
        Some(raw) => {
            let parsed = PaymentMethod::parse(raw);
            if parsed.is_none() {
                errs.push("payment_method", "Payment method must be pix, credit, debit or cash");
            }
            parsed
        }
    };

    let installments = draft.installments.unwrap_or(1);
    if installments == 0 {
        errs.push("installments", "Installments must be at least 1");
    } else if amount > Decimal::ZERO && amount < MIN_AMOUNT * Decimal::from(installments) {
        errs.push(
            "installments",
            format!("Each of the {installments} installments must be at least 0,01"),
        );
    }

    match tx_type {
        Some(TxType::Transfer) => {
            match draft.to_account_id {
                None => errs.push("to_account", "Transfers need a destination account"),
                Some(to) if Some(to) == draft.account_id => {
                    errs.push("to_account", "Destination must differ from the source account")
                }
                Some(_) => {}
            }
            if draft.category_id.is_some() {
                errs.push("category", "Transfers have no category");
            }
            if installments > 1 {
                errs.push("installments", "Transfers cannot be split into installments");
            }
        }
        Some(_) => {
            if draft.to_account_id.is_some() {
                errs.push("to_account", "Only transfers have a destination account");
            }
        }
        None => {}
    }

    errs.into_result(|| {
        let mut txn = Transaction::new(
            tx_type.unwrap_or(TxType::Expense),
            draft.account_id.unwrap_or_default(),
            description.to_string(),
            amount,
            draft.date.trim().to_string(),
        );
        txn.to_account_id = draft.to_account_id;
        txn.category_id = draft.category_id;
        txn.vendor_id = draft.vendor_id;
        txn.payment_method = payment_method;
        txn.notes = draft.notes.trim().to_string();
        ValidTransaction { txn, installments }
    })
}

fn too_large(what: &str) -> String {
    format!("{what} must be at most {}", format_amount(MAX_AMOUNT, ""))
}

// ── Rules ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) struct RuleDraft {
    pub(crate) contains: String,
    pub(crate) category_id: Option<i64>,
    pub(crate) priority: i32,
}

pub(crate) fn rule(draft: &RuleDraft) -> Result<Rule, FieldErrors> {
    let mut errs = FieldErrors::default();
    let category_id = draft.category_id.unwrap_or_default();
    if draft.category_id.is_none() {
        errs.push("category", "Select a category");
    }

    match Rule::new(&draft.contains, category_id, draft.priority) {
        Ok(rule) if errs.is_empty() => Ok(rule),
        Ok(_) => Err(errs),
        Err(e) => {
            push_rule_error(&mut errs, &e);
            // Report the other rule field too, not just the first failure
            if let InvalidRuleError::PatternTooShort { .. } = e {
                if !PRIORITY_RANGE.contains(&draft.priority) {
                    push_rule_error(&mut errs, &InvalidRuleError::PriorityOutOfRange(draft.priority));
                }
            }
            Err(errs)
        }
    }
}

fn push_rule_error(errs: &mut FieldErrors, e: &InvalidRuleError) {
    let field = match e {
        InvalidRuleError::PatternTooShort { .. } => "contains",
        InvalidRuleError::PriorityOutOfRange(_) => "priority",
    };
    errs.push(field, e.to_string());
}

// ── Budgets ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) struct BudgetDraft {
    pub(crate) category_id: Option<i64>,
    pub(crate) limit: String,
    pub(crate) month: String,
}

pub(crate) fn budget(draft: &BudgetDraft) -> Result<Budget, FieldErrors> {
    let mut errs = FieldErrors::default();
    if draft.category_id.is_none() {
        errs.push("category", "Select a category");
    }
    let limit = match parse_amount(&draft.limit).map(Budget::check_limit) {
        None => {
            errs.push("limit", "Limit must be a number with at most two decimals");
            Decimal::ZERO
        }
        Some(Err(e)) => {
            errs.push("limit", e.to_string());
            Decimal::ZERO
        }
        Some(Ok(limit)) => limit,
    };
    let month = draft.month.trim();
    if !is_month_key(month) {
        errs.push("month", "Invalid month, expected YYYY-MM");
    }
    if !errs.is_empty() {
        return Err(errs);
    }

    Budget::new(draft.category_id.unwrap_or_default(), month.to_string(), limit).map_err(|e| {
        let mut errs = FieldErrors::default();
        errs.push("limit", e.to_string());
        errs
    })
}

// ── Accounts ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub(crate) struct AccountDraft {
    pub(crate) name: String,
    pub(crate) account_type: String,
    pub(crate) opening_balance: Option<String>,
    pub(crate) color: Option<String>,
}

pub(crate) fn account(draft: &AccountDraft) -> Result<Account, FieldErrors> {
    let mut errs = FieldErrors::default();
    let name = draft.name.trim();
    if name.is_empty() {
        errs.push("name", "Name is required");
    }
    let account_type = AccountType::parse(&draft.account_type);
    if account_type.is_none() {
        let known: Vec<&str> = AccountType::all().iter().map(AccountType::as_str).collect();
        errs.push("type", format!("Type must be one of: {}", known.join(", ")));
    }
    let opening_balance = match draft.opening_balance.as_deref() {
        None => Decimal::ZERO,
        Some(raw) => parse_amount(raw).unwrap_or_else(|| {
            errs.push("balance", format!("Invalid amount: {raw}"));
            Decimal::ZERO
        }),
    };

    errs.into_result(|| {
        let mut account = Account::new(name.to_string(), account_type.unwrap_or(AccountType::Bank));
        account.opening_balance = opening_balance;
        account.color = draft.color.clone().unwrap_or_default();
        account
    })
}

// ── Cards ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) struct CardDraft {
    pub(crate) account_id: Option<i64>,
    pub(crate) name: String,
    pub(crate) limit: String,
    pub(crate) closing_day: u32,
    pub(crate) due_day: u32,
}

pub(crate) fn card(draft: &CardDraft) -> Result<Card, FieldErrors> {
    let mut errs = FieldErrors::default();
    if draft.account_id.is_none() {
        errs.push("account", "Account is required");
    }
    let name = draft.name.trim();
    if name.is_empty() {
        errs.push("name", "Name is required");
    }
    let limit = parse_amount(&draft.limit).unwrap_or(Decimal::ZERO);
    if limit <= Decimal::ZERO {
        errs.push("limit", "Limit must be greater than zero");
    } else if limit > MAX_AMOUNT {
        errs.push("limit", too_large("Limit"));
    }
    if !(1..=31).contains(&draft.closing_day) {
        errs.push("closing_day", "Closing day must be between 1 and 31");
    }
    if !(1..=31).contains(&draft.due_day) {
        errs.push("due_day", "Due day must be between 1 and 31");
    }

    errs.into_result(|| {
        Card::new(
            draft.account_id.unwrap_or_default(),
            name.to_string(),
            draft.closing_day,
            draft.due_day,
            limit,
        )
    })
}

// ── Purchases ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) struct ItemDraft {
    pub(crate) item_name: String,
    pub(crate) qty: u32,
    pub(crate) unit_price: String,
}

#[derive(Debug, Clone)]
pub(crate) struct PurchaseDraft {
    pub(crate) vendor_id: Option<i64>,
    pub(crate) expected_date: Option<String>,
    pub(crate) items: Vec<ItemDraft>,
}

pub(crate) fn purchase(draft: &PurchaseDraft) -> Result<Purchase, FieldErrors> {
    let mut errs = FieldErrors::default();
    if draft.vendor_id.is_none() {
        errs.push("vendor", "Select a vendor");
    }
    if let Some(d) = draft.expected_date.as_deref() {
        if parse_iso_date(d).is_none() {
            errs.push("expected_date", "Date must be a valid YYYY-MM-DD date");
        }
    }
    if draft.items.is_empty() {
        errs.push("items", "Add at least one item");
    }

    let mut items = Vec::with_capacity(draft.items.len());
    for (i, item) in draft.items.iter().enumerate() {
        let name = item.item_name.trim();
        if name.is_empty() {
            errs.push(format!("items[{i}].item_name"), "Item name is required");
        }
        if item.qty == 0 {
            errs.push(format!("items[{i}].qty"), "Quantity must be greater than 0");
        }
        let unit_price = match parse_amount(&item.unit_price) {
            Some(p) if p > MAX_AMOUNT => {
                errs.push(format!("items[{i}].unit_price"), too_large("Price"));
                Decimal::ZERO
            }
            Some(p) if p >= Decimal::ZERO => p,
            _ => {
                errs.push(format!("items[{i}].unit_price"), "Price must be zero or positive");
                Decimal::ZERO
            }
        };
        items.push(PurchaseItem {
            id: None,
            item_name: name.to_string(),
            qty: item.qty,
            unit_price,
        });
    }

    errs.into_result(|| {
        Purchase::new(
            draft.vendor_id.unwrap_or_default(),
            draft.expected_date.clone(),
            items,
        )
    })
}
