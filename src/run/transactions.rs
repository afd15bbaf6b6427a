use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use super::util::{
    category_name, date_arg, default_account, find_account, find_category, find_vendor, month_arg,
    rule_line, truncate,
};
use crate::budget::compute_usage;
use crate::categorize::category_for_new;
use crate::db::{Database, TxnFilter};
use crate::export::write_transactions_csv;
use crate::money::{format_amount, format_percent};
use crate::schedule::split_installments;
use crate::settings::Settings;
use crate::validate::{self, TransactionDraft};

pub(crate) struct AddArgs {
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) tx_type: String,
    pub(crate) date: Option<String>,
    pub(crate) account: Option<String>,
    pub(crate) to: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) vendor: Option<String>,
    pub(crate) method: Option<String>,
    pub(crate) installments: Option<u32>,
    pub(crate) notes: Option<String>,
}

pub(crate) fn add(db: &mut Database, settings: &Settings, args: AddArgs) -> Result<()> {
    let accounts = db.get_accounts()?;
    let categories = db.get_categories()?;
    let account = default_account(
        &accounts,
        args.account.as_deref(),
        settings.default_account.as_deref(),
    )?;
    let to_account_id = match args.to.as_deref() {
        Some(key) => find_account(&accounts, key)?.id,
        None => None,
    };
    let category_id = match args.category.as_deref() {
        Some(key) => find_category(&categories, key)?.id,
        None => None,
    };
    let vendor_id = match args.vendor.as_deref() {
        Some(key) => find_vendor(&db.get_vendors()?, key)?.id,
        None => None,
    };
    let date = match args.date {
        Some(d) => d,
        None => date_arg(None)?.format("%Y-%m-%d").to_string(),
    };

    let draft = TransactionDraft {
        tx_type: args.tx_type,
        amount: args.amount,
        date,
        description: args.description,
        account_id: account.id,
        to_account_id,
        category_id,
        vendor_id,
        payment_method: args.method,
        installments: args.installments,
        notes: args.notes.unwrap_or_default(),
    };
    let valid = validate::transaction(&draft)?;
    let mut txn = valid.txn;

    if txn.category_id.is_none() {
        txn.category_id = category_for_new(&txn, &db.get_rules()?);
        if txn.category_id.is_some() {
            tracing::debug!(description = %txn.description, category_id = ?txn.category_id, "auto-categorized");
            println!(
                "Auto-categorized as {}",
                category_name(&categories, txn.category_id)
            );
        }
    }

    let parts = split_installments(&txn, valid.installments)?;
    let ids = match parts.as_slice() {
        [single] => vec![db.insert_transaction(single)?],
        _ => db.insert_transactions_batch(&parts)?,
    };
    match ids.as_slice() {
        [id] => println!(
            "Added #{id}: {} {} on {}",
            txn.description,
            format_amount(txn.amount, &settings.currency_symbol),
            txn.date
        ),
        _ => println!(
            "Added {} installments of {} for {}",
            ids.len(),
            format_amount(parts.last().map_or(txn.amount, |p| p.amount), &settings.currency_symbol),
            txn.description
        ),
    }

    warn_if_over_budget(db, settings, &parts)
}

/// Tell the user when the new spending pushed a category past its budget.
fn warn_if_over_budget(
    db: &Database,
    settings: &Settings,
    added: &[crate::models::Transaction],
) -> Result<()> {
    let Some(first) = added.first().filter(|t| t.is_expense()) else {
        return Ok(());
    };
    let Some(category_id) = first.category_id else {
        return Ok(());
    };
    let budgets = db.get_budgets(Some(first.month()))?;
    let Some(budget) = budgets.iter().find(|b| b.category_id == category_id) else {
        return Ok(());
    };
    let filter = TxnFilter {
        month: Some(budget.month.clone()),
        category_id: Some(category_id),
        ..TxnFilter::default()
    };
    let usage = compute_usage(budget, &db.get_transactions(&filter)?)?;
    if usage.is_over() {
        println!(
            "Over budget: {} used of {} ({}), {} over",
            format_amount(usage.used_amount, &settings.currency_symbol),
            format_amount(budget.limit_amount, &settings.currency_symbol),
            format_percent(usage.percent),
            format_amount(usage.over_by, &settings.currency_symbol),
        );
    }
    Ok(())
}

pub(crate) fn list(
    db: &mut Database,
    settings: &Settings,
    month: Option<String>,
    account: Option<String>,
    category: Option<String>,
    search: Option<String>,
    limit: u32,
) -> Result<()> {
    let categories = db.get_categories()?;
    let filter = TxnFilter {
        month: month.map(|m| month_arg(Some(m))).transpose()?,
        account_id: match account.as_deref() {
            Some(key) => find_account(&db.get_accounts()?, key)?.id,
            None => None,
        },
        category_id: match category.as_deref() {
            Some(key) => find_category(&categories, key)?.id,
            None => None,
        },
        search,
        limit: Some(limit),
    };
    let txns = db.get_transactions(&filter)?;
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<5} {:<10} {:<8} {:<30} {:<14} {:>14}",
        "ID", "Date", "Type", "Description", "Category", "Amount"
    );
    println!("{}", rule_line(86));
    for t in &txns {
        let amount = if t.is_expense() { -t.amount } else { t.amount };
        println!(
            "{:<5} {:<10} {:<8} {:<30} {:<14} {:>14}",
            t.id.unwrap_or(0),
            t.date,
            t.tx_type,
            truncate(&t.description, 30),
            truncate(&category_name(&categories, t.category_id), 14),
            format_amount(amount, &settings.currency_symbol),
        );
    }
    Ok(())
}

pub(crate) fn recategorize(db: &mut Database, id: i64, category: &str) -> Result<()> {
    let txn = db
        .get_transaction(id)?
        .with_context(|| format!("No transaction with ID {id}"))?;
    if txn.is_transfer() {
        bail!("Transfers have no category");
    }
    let categories = db.get_categories()?;
    let cat = find_category(&categories, category)?;
    db.update_transaction_category(id, cat.id)?;
    println!("#{id} {} → {}", txn.description, cat.name);
    Ok(())
}

pub(crate) fn delete(db: &mut Database, id: i64) -> Result<()> {
    if !db.delete_transaction(id)? {
        bail!("No transaction with ID {id}");
    }
    println!("Deleted transaction #{id}");
    Ok(())
}

pub(crate) fn export(db: &mut Database, output: Option<PathBuf>, month: Option<String>) -> Result<()> {
    let filter = TxnFilter {
        month: month.map(|m| month_arg(Some(m))).transpose()?,
        ..TxnFilter::default()
    };
    let txns = db.get_transactions(&filter)?;
    let accounts = db.get_accounts()?;
    let categories = db.get_categories()?;

    match output {
        Some(path) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let count = write_transactions_csv(&txns, &accounts, &categories, file)?;
            println!("Exported {count} transactions to {}", path.display());
        }
        None => {
            write_transactions_csv(&txns, &accounts, &categories, std::io::stdout().lock())?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "transactions_tests.rs"]
mod tests;
