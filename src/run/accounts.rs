use anyhow::{bail, Result};

use super::util::{rule_line, truncate};
use crate::db::Database;
use crate::money::format_amount;
use crate::reports::account_balance;
use crate::settings::Settings;
use crate::validate::{self, AccountDraft};

pub(crate) fn add(
    db: &mut Database,
    name: String,
    account_type: String,
    opening: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let draft = AccountDraft {
        name,
        account_type,
        opening_balance: opening,
        color,
    };
    let account = validate::account(&draft)?;
    if crate::models::Account::find_by_name(&db.get_accounts()?, &account.name).is_some() {
        bail!("Account '{}' already exists", account.name);
    }
    let id = db.insert_account(&account)?;
    println!("Added account #{id}: {} ({})", account.name, account.account_type);
    Ok(())
}

pub(crate) fn list(db: &mut Database, settings: &Settings) -> Result<()> {
    let accounts = db.get_accounts()?;
    if accounts.is_empty() {
        println!("No accounts");
        return Ok(());
    }
    let transactions = db.get_all_transactions()?;

    println!("{:<4} {:<20} {:<12} {:>16}", "ID", "Name", "Type", "Balance");
    println!("{}", rule_line(55));
    for acct in &accounts {
        println!(
            "{:<4} {:<20} {:<12} {:>16}",
            acct.id.unwrap_or(0),
            truncate(&acct.name, 20),
            acct.account_type,
            format_amount(account_balance(acct, &transactions), &settings.currency_symbol),
        );
    }
    Ok(())
}
