use anyhow::{bail, Context, Result};

use super::util::{category_name, find_account, find_card, month_arg, rule_line, today, truncate};
use crate::db::Database;
use crate::invoice::{due_date, invoice_total, invoice_transactions, reference_month};
use crate::models::{AccountType, Card, InvoiceStatus};
use crate::money::format_amount;
use crate::settings::Settings;
use crate::validate::{self, CardDraft};

pub(crate) fn add(
    db: &mut Database,
    name: String,
    account: &str,
    closing: u32,
    due: u32,
    limit: String,
) -> Result<()> {
    let accounts = db.get_accounts()?;
    let acct = find_account(&accounts, account)?;
    if acct.account_type != AccountType::Card {
        bail!(
            "Account '{}' is a {} account, cards must be billed through a card account",
            acct.name,
            acct.account_type
        );
    }
    let draft = CardDraft {
        account_id: acct.id,
        name,
        limit,
        closing_day: closing,
        due_day: due,
    };
    let card = validate::card(&draft)?;
    let id = db.insert_card(&card)?;
    println!(
        "Added card #{id}: {} (closes on day {}, due on day {})",
        card.name, card.closing_day, card.due_day
    );
    Ok(())
}

/// Month of the invoice asked for, else the one today's purchases go to.
fn invoice_month(card: &Card, month: Option<String>) -> Result<String> {
    match month {
        Some(m) => month_arg(Some(m)),
        None => Ok(reference_month(today(), card.closing_day)),
    }
}

pub(crate) fn list(db: &mut Database, settings: &Settings) -> Result<()> {
    let cards = db.get_cards()?;
    if cards.is_empty() {
        println!("No cards");
        return Ok(());
    }
    let transactions = db.get_all_transactions()?;
    let sym = &settings.currency_symbol;

    println!(
        "{:<4} {:<18} {:>14} {:<8} {:>14} {:<7} {:<10}",
        "ID", "Name", "Limit", "Invoice", "Total", "Status", "Due"
    );
    println!("{}", rule_line(82));
    for card in &cards {
        let card_id = card.id.context("Card has no ID")?;
        let month = reference_month(today(), card.closing_day);
        let status = db.get_invoice_status(card_id, &month)?;
        let due = due_date(card, &month).map_or_else(String::new, |d| d.to_string());
        println!(
            "{:<4} {:<18} {:>14} {:<8} {:>14} {:<7} {:<10}",
            card_id,
            truncate(&card.name, 18),
            format_amount(card.limit, sym),
            month,
            format_amount(invoice_total(card, &month, &transactions), sym),
            status,
            due,
        );
    }
    Ok(())
}

pub(crate) fn invoice(
    db: &mut Database,
    settings: &Settings,
    card: &str,
    month: Option<String>,
) -> Result<()> {
    let cards = db.get_cards()?;
    let card = find_card(&cards, card)?;
    let card_id = card.id.context("Card has no ID")?;
    let month = invoice_month(card, month)?;
    let status = db.get_invoice_status(card_id, &month)?;
    let transactions = db.get_all_transactions()?;
    let categories = db.get_categories()?;
    let sym = &settings.currency_symbol;

    let items = invoice_transactions(card, &month, &transactions);
    let due = due_date(card, &month).map_or_else(|| "-".to_string(), |d| d.to_string());
    println!("{} invoice {month} ({status}), due {due}", card.name);
    println!("{}", rule_line(70));
    for t in &items {
        println!(
            "{:<10} {:<32} {:<12} {:>13}",
            t.date,
            truncate(&t.description, 32),
            truncate(&category_name(&categories, t.category_id), 12),
            format_amount(t.amount, sym),
        );
    }
    if items.is_empty() {
        println!("No purchases");
    }
    println!("{}", rule_line(70));
    println!(
        "{:<56} {:>13}",
        "Total",
        format_amount(invoice_total(card, &month, &transactions), sym)
    );
    Ok(())
}

fn transition(
    db: &mut Database,
    card: &str,
    month: Option<String>,
    step: fn(InvoiceStatus) -> Result<InvoiceStatus, crate::error::InvoiceError>,
) -> Result<(String, String, InvoiceStatus)> {
    let cards = db.get_cards()?;
    let card = find_card(&cards, card)?;
    let card_id = card.id.context("Card has no ID")?;
    let month = invoice_month(card, month)?;

    let current = db.get_invoice_status(card_id, &month)?;
    let next = step(current).with_context(|| format!("{} invoice {month}", card.name))?;
    db.set_invoice_status(card_id, &month, next)?;
    tracing::debug!(card_id, month = %month, from = %current, to = %next, "invoice status changed");
    Ok((card.name.clone(), month, next))
}

pub(crate) fn close(db: &mut Database, card: &str, month: Option<String>) -> Result<()> {
    let (name, month, status) = transition(db, card, month, InvoiceStatus::close)?;
    println!("{name} invoice {month} is now {status}");
    Ok(())
}

pub(crate) fn pay(db: &mut Database, card: &str, month: Option<String>) -> Result<()> {
    let (name, month, status) = transition(db, card, month, InvoiceStatus::pay)?;
    println!("{name} invoice {month} is now {status}");
    Ok(())
}

#[cfg(test)]
#[path = "cards_tests.rs"]
mod tests;
