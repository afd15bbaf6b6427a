use std::io::Write;

use anyhow::{Context, Result};

use crate::models::{Account, Category, Transaction};

pub(crate) const TRANSACTIONS_HEADER: [&str; 6] =
    ["date", "type", "account", "category", "description", "amount"];

/// Write transactions as CSV, oldest first. Accounts and categories are
/// written by name; amounts are plain positive decimals with two places.
/// Returns the number of rows written.
pub(crate) fn write_transactions_csv(
    transactions: &[Transaction],
    accounts: &[Account],
    categories: &[Category],
    writer: impl Write,
) -> Result<usize> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    csv.write_record(TRANSACTIONS_HEADER)
        .context("Failed to write CSV header")?;

    for txn in &sorted {
        let account = Account::find_by_id(accounts, txn.account_id)
            .map(|a| a.name.as_str())
            .unwrap_or("");
        let category = txn
            .category_id
            .and_then(|id| Category::find_by_id(categories, id))
            .map(|c| c.name.as_str())
            .unwrap_or("");
        let amount = format!("{:.2}", txn.amount);
        csv.write_record([
            txn.date.as_str(),
            txn.tx_type.as_str(),
            account,
            category,
            txn.description.as_str(),
            amount.as_str(),
        ])
        .context("Failed to write CSV row")?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(sorted.len())
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
