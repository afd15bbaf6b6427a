use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use crate::budget::month_usage;
use crate::error::InvalidBudgetError;
use crate::invoice::{days_to_next_due, upcoming_bills, UpcomingBill};
use crate::models::{Account, Budget, Card, CardInvoice, Category, Transaction, TxType};
use crate::money::round_cents;

pub(crate) const UNCATEGORIZED_NAME: &str = "Other";
pub(crate) const UNCATEGORIZED_COLOR: &str = "#6B7280";
const DASHBOARD_TOP_CATEGORIES: usize = 5;

/// Everything the reports read, loaded once by the caller.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Snapshot<'a> {
    pub(crate) accounts: &'a [Account],
    pub(crate) categories: &'a [Category],
    pub(crate) transactions: &'a [Transaction],
    pub(crate) budgets: &'a [Budget],
    pub(crate) cards: &'a [Card],
    pub(crate) invoices: &'a [CardInvoice],
}

pub(crate) fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

fn first_of_month(month: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").ok()
}

// ── Balances ──────────────────────────────────────────────────

pub(crate) fn account_balance(account: &Account, transactions: &[Transaction]) -> Decimal {
    let Some(id) = account.id else {
        return account.opening_balance;
    };
    account.opening_balance + transactions.iter().map(|t| t.balance_effect(id)).sum::<Decimal>()
}

pub(crate) fn total_balance(accounts: &[Account], transactions: &[Transaction]) -> Decimal {
    accounts
        .iter()
        .map(|a| account_balance(a, transactions))
        .sum()
}

/// Change a transaction makes to the combined balance of `accounts`.
/// A transfer between two tracked accounts nets to zero.
fn net_effect(txn: &Transaction, accounts: &[Account]) -> Decimal {
    accounts
        .iter()
        .filter_map(|a| a.id)
        .map(|id| txn.balance_effect(id))
        .sum()
}

/// Income and expense totals for `month`. Transfers count as neither.
pub(crate) fn month_totals(month: &str, transactions: &[Transaction]) -> (Decimal, Decimal) {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for t in transactions.iter().filter(|t| t.in_month(month)) {
        match t.tx_type {
            TxType::Income => income += t.amount,
            TxType::Expense => expense += t.amount,
            TxType::Transfer => {}
        }
    }
    (income, expense)
}

// ── Dashboard ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DashboardStats {
    pub(crate) month: String,
    pub(crate) total_balance: Decimal,
    pub(crate) month_income: Decimal,
    pub(crate) month_expense: Decimal,
    pub(crate) budget_usage_percent: Decimal,
    pub(crate) upcoming_bills: Vec<UpcomingBill>,
    pub(crate) next_invoice_days: Option<i64>,
    /// Largest expense categories of the month.
    pub(crate) top_expenses: Vec<CategoryTotal>,
}

pub(crate) fn dashboard_stats(
    snapshot: Snapshot<'_>,
    today: NaiveDate,
    bill_warning_days: i64,
) -> Result<DashboardStats, InvalidBudgetError> {
    let month = month_key(today);
    let (month_income, month_expense) = month_totals(&month, snapshot.transactions);
    let usage = month_usage(&month, snapshot.budgets, snapshot.transactions)?;

    Ok(DashboardStats {
        total_balance: total_balance(snapshot.accounts, snapshot.transactions),
        month_income,
        month_expense,
        budget_usage_percent: round_cents(usage.percent()?),
        upcoming_bills: upcoming_bills(snapshot.cards, snapshot.invoices, today, bill_warning_days),
        next_invoice_days: days_to_next_due(snapshot.cards, snapshot.invoices, today),
        top_expenses: expenses_by_category(&month, snapshot.transactions, snapshot.categories)
            .into_iter()
            .take(DASHBOARD_TOP_CATEGORIES)
            .collect(),
        month,
    })
}

// ── Balance chart ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BalancePoint {
    pub(crate) date: NaiveDate,
    pub(crate) balance: Decimal,
}

/// End-of-day combined balance for every day of `month`.
pub(crate) fn balance_chart(
    month: &str,
    accounts: &[Account],
    transactions: &[Transaction],
) -> Vec<BalancePoint> {
    let Some(first) = first_of_month(month) else {
        return Vec::new();
    };
    let first_key = first.format("%Y-%m-%d").to_string();

    let mut balance: Decimal = accounts.iter().map(|a| a.opening_balance).sum();
    let mut per_day: HashMap<&str, Decimal> = HashMap::new();
    for t in transactions {
        let effect = net_effect(t, accounts);
        if t.date < first_key {
            balance += effect;
        } else if t.in_month(month) {
            *per_day.entry(t.date.as_str()).or_default() += effect;
        }
    }

    first
        .iter_days()
        .take_while(|d| month_key(*d) == month)
        .map(|date| {
            let key = date.format("%Y-%m-%d").to_string();
            balance += per_day.get(key.as_str()).copied().unwrap_or_default();
            BalancePoint { date, balance }
        })
        .collect()
}

// ── By category ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryTotal {
    pub(crate) category_id: Option<i64>,
    pub(crate) name: String,
    pub(crate) color: String,
    pub(crate) amount: Decimal,
}

/// Totals of `tx_type` transactions in `month` grouped by category, largest
/// first. Transactions without a known category share one bucket.
pub(crate) fn totals_by_category(
    month: &str,
    tx_type: TxType,
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    let mut sums: HashMap<Option<i64>, Decimal> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.tx_type == tx_type && t.in_month(month))
    {
        let known = t
            .category_id
            .filter(|id| Category::find_by_id(categories, *id).is_some());
        *sums.entry(known).or_default() += t.amount;
    }

    let mut rows: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(category_id, amount)| {
            let cat = category_id.and_then(|id| Category::find_by_id(categories, id));
            CategoryTotal {
                category_id,
                name: cat.map_or_else(|| UNCATEGORIZED_NAME.to_string(), |c| c.name.clone()),
                color: cat
                    .map(|c| c.color.clone())
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| UNCATEGORIZED_COLOR.to_string()),
                amount: round_cents(amount),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
    rows
}

pub(crate) fn expenses_by_category(
    month: &str,
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    totals_by_category(month, TxType::Expense, transactions, categories)
}

pub(crate) fn income_by_category(
    month: &str,
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    totals_by_category(month, TxType::Income, transactions, categories)
}

// ── Cash flow ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CashFlowRow {
    pub(crate) month: String,
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) net: Decimal,
}

/// Income, expense and net for the `months` months ending at `last_month`,
/// oldest first. Months without activity are reported as zero.
pub(crate) fn cash_flow(
    last_month: &str,
    months: u32,
    transactions: &[Transaction],
) -> Vec<CashFlowRow> {
    let Some(last) = first_of_month(last_month) else {
        return Vec::new();
    };
    (0..months)
        .rev()
        .filter_map(|back| last.checked_sub_months(Months::new(back)))
        .map(|start| {
            let month = month_key(start);
            let (income, expense) = month_totals(&month, transactions);
            CashFlowRow {
                net: income - expense,
                month,
                income,
                expense,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;
