use anyhow::{bail, Context, Result};

use super::util::{
    category_name, date_arg, default_account, find_account, find_category, rule_line, truncate,
};
use crate::db::Database;
use crate::models::{Frequency, Recurrence};
use crate::money::format_amount;
use crate::schedule::due_occurrences;
use crate::settings::Settings;
use crate::validate::{self, TransactionDraft};

pub(crate) struct AddArgs {
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) tx_type: String,
    pub(crate) account: Option<String>,
    pub(crate) to: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) freq: String,
    pub(crate) start: Option<String>,
    pub(crate) end: Option<String>,
}

pub(crate) fn add(db: &mut Database, settings: &Settings, args: AddArgs) -> Result<()> {
    let freq = Frequency::parse(&args.freq).with_context(|| {
        format!("Invalid frequency '{}', expected weekly, monthly or yearly", args.freq)
    })?;
    let start = date_arg(args.start)?;
    let end = args.end.map(|d| date_arg(Some(d))).transpose()?;
    if end.is_some_and(|e| e < start) {
        bail!("End date is before the first occurrence");
    }

    let accounts = db.get_accounts()?;
    let categories = db.get_categories()?;
    let account = default_account(
        &accounts,
        args.account.as_deref(),
        settings.default_account.as_deref(),
    )?;
    let draft = TransactionDraft {
        tx_type: args.tx_type,
        amount: args.amount,
        date: start.format("%Y-%m-%d").to_string(),
        description: args.description,
        account_id: account.id,
        to_account_id: match args.to.as_deref() {
            Some(key) => find_account(&accounts, key)?.id,
            None => None,
        },
        category_id: match args.category.as_deref() {
            Some(key) => find_category(&categories, key)?.id,
            None => None,
        },
        vendor_id: None,
        payment_method: None,
        installments: None,
        notes: String::new(),
    };
    let template = validate::transaction(&draft)?.txn;

    let rec = Recurrence {
        id: None,
        next_run_at: template.date.clone(),
        end_at: end.map(|e| e.format("%Y-%m-%d").to_string()),
        template,
        freq,
    };
    let id = db.insert_recurrence(&rec)?;
    println!(
        "Added recurrence #{id}: {} {} {}, starting {}",
        rec.template.description,
        format_amount(rec.template.amount, &settings.currency_symbol),
        rec.freq,
        rec.next_run_at
    );
    Ok(())
}

pub(crate) fn list(db: &mut Database, settings: &Settings) -> Result<()> {
    let recurrences = db.get_recurrences()?;
    if recurrences.is_empty() {
        println!("No recurrences");
        return Ok(());
    }
    let categories = db.get_categories()?;

    println!(
        "{:<4} {:<26} {:<8} {:<14} {:>14} {:<10} {:<10}",
        "ID", "Description", "Freq", "Category", "Amount", "Next", "Ends"
    );
    println!("{}", rule_line(92));
    for r in &recurrences {
        let t = &r.template;
        println!(
            "{:<4} {:<26} {:<8} {:<14} {:>14} {:<10} {:<10}",
            r.id.unwrap_or(0),
            truncate(&t.description, 26),
            r.freq,
            truncate(&category_name(&categories, t.category_id), 14),
            format_amount(t.amount, &settings.currency_symbol),
            r.next_run_at,
            r.end_at.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

/// Record every occurrence due on or before `date` and move each recurrence
/// forward.
pub(crate) fn run(db: &mut Database, date: Option<String>) -> Result<()> {
    let until = date_arg(date)?;
    let mut recorded = 0;
    for rec in db.get_recurrences()? {
        let Some(id) = rec.id else { continue };
        let due = due_occurrences(&rec, until)?;
        if due.occurrences.is_empty() {
            continue;
        }
        db.record_recurrence_run(id, &due.occurrences, &due.next_run_at)?;
        tracing::info!(
            recurrence_id = id,
            count = due.occurrences.len(),
            next_run_at = %due.next_run_at,
            finished = due.finished,
            "recorded recurrence occurrences"
        );
        for txn in &due.occurrences {
            println!("  {} {}", txn.date, txn.description);
        }
        recorded += due.occurrences.len();
    }
    println!("Recorded {recorded} transaction(s) due by {until}");
    Ok(())
}

#[cfg(test)]
#[path = "recurrences_tests.rs"]
mod tests;
