use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{Card, CardInvoice, InvoiceStatus, Transaction};
use crate::money::round_cents;
use crate::validate::parse_iso_date;

/// Invoice a purchase on `date` lands on: up to and including the closing
/// day it is billed in the same month, afterwards in the next one.
pub(crate) fn reference_month(date: NaiveDate, closing_day: u32) -> String {
    let month = if date.day() <= closing_day {
        Some(date)
    } else {
        date.with_day(1)
            .and_then(|d| d.checked_add_months(Months::new(1)))
    };
    month.unwrap_or(date).format("%Y-%m").to_string()
}

/// Transactions billed on the card's invoice for `month`, oldest first.
pub(crate) fn invoice_transactions<'a>(
    card: &Card,
    month: &str,
    transactions: &'a [Transaction],
) -> Vec<&'a Transaction> {
    let mut billed: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense() && t.account_id == card.account_id)
        .filter(|t| {
            parse_iso_date(&t.date)
                .is_some_and(|d| reference_month(d, card.closing_day) == month)
        })
        .collect();
    billed.sort_by(|a, b| a.date.cmp(&b.date));
    billed
}

/// Sum of the card account's expenses billed in `month`.
pub(crate) fn invoice_total(card: &Card, month: &str, transactions: &[Transaction]) -> Decimal {
    round_cents(
        invoice_transactions(card, month, transactions)
            .iter()
            .map(|t| t.amount)
            .sum(),
    )
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    next.pred_opt().map(|d| d.day())
}

/// Due date of the invoice for `month` ("YYYY-MM"), clamped to the month's
/// last day. `None` for a malformed month.
pub(crate) fn due_date(card: &Card, month: &str) -> Option<NaiveDate> {
    let (year, mon) = month.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let mon: u32 = mon.parse().ok()?;
    let last = last_day_of_month(year, mon)?;
    NaiveDate::from_ymd_opt(year, mon, card.due_day.min(last))
}

/// The invoice for `month`, with its stored status (open when never stored).
pub(crate) fn build_invoice(
    card: &Card,
    month: &str,
    status: Option<InvoiceStatus>,
    transactions: &[Transaction],
) -> Option<CardInvoice> {
    Some(CardInvoice {
        card_id: card.id?,
        reference_month: month.to_string(),
        status: status.unwrap_or(InvoiceStatus::Open),
        total: invoice_total(card, month, transactions),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UpcomingBill {
    pub(crate) card_name: String,
    pub(crate) reference_month: String,
    pub(crate) due_date: NaiveDate,
    pub(crate) days_left: i64,
    pub(crate) total: Decimal,
}

/// Unpaid invoices due between `today` and `today + within_days`, soonest first.
pub(crate) fn upcoming_bills(
    cards: &[Card],
    invoices: &[CardInvoice],
    today: NaiveDate,
    within_days: i64,
) -> Vec<UpcomingBill> {
    let mut bills: Vec<UpcomingBill> = invoices
        .iter()
        .filter(|inv| inv.status != InvoiceStatus::Paid)
        .filter_map(|inv| {
            let card = cards.iter().find(|c| c.id == Some(inv.card_id))?;
            let due = due_date(card, &inv.reference_month)?;
            let days_left = (due - today).num_days();
            (0..=within_days).contains(&days_left).then(|| UpcomingBill {
                card_name: card.name.clone(),
                reference_month: inv.reference_month.clone(),
                due_date: due,
                days_left,
                total: inv.total,
            })
        })
        .collect();
    bills.sort_by_key(|b| b.due_date);
    bills
}

/// Days until the nearest unpaid invoice falls due, if any is still ahead.
pub(crate) fn days_to_next_due(
    cards: &[Card],
    invoices: &[CardInvoice],
    today: NaiveDate,
) -> Option<i64> {
    invoices
        .iter()
        .filter(|inv| inv.status != InvoiceStatus::Paid)
        .filter_map(|inv| {
            let card = cards.iter().find(|c| c.id == Some(inv.card_id))?;
            let due = due_date(card, &inv.reference_month)?;
            Some((due - today).num_days())
        })
        .filter(|days| *days >= 0)
        .min()
}
