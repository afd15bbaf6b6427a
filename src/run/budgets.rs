use anyhow::{bail, Result};

use super::util::{category_name, find_category, month_arg, rule_line, truncate};
use crate::budget::month_usage;
use crate::db::{Database, TxnFilter};
use crate::money::{format_amount, format_percent};
use crate::settings::Settings;
use crate::validate::{self, BudgetDraft};

pub(crate) fn set(db: &mut Database, category: &str, limit: String, month: Option<String>) -> Result<()> {
    let categories = db.get_categories()?;
    let draft = BudgetDraft {
        category_id: find_category(&categories, category)?.id,
        limit,
        month: month_arg(month)?,
    };
    let budget = validate::budget(&draft)?;
    let id = db.upsert_budget(&budget)?;
    println!(
        "Budget #{id}: {} limited to {} in {}",
        category_name(&categories, Some(budget.category_id)),
        budget.limit_amount,
        budget.month
    );
    Ok(())
}

pub(crate) fn list(db: &mut Database, settings: &Settings, month: Option<String>) -> Result<()> {
    let month = month_arg(month)?;
    let budgets = db.get_budgets(Some(&month))?;
    if budgets.is_empty() {
        println!("No budgets for {month}");
        return Ok(());
    }
    let categories = db.get_categories()?;
    let filter = TxnFilter {
        month: Some(month.clone()),
        ..TxnFilter::default()
    };
    let usage = month_usage(&month, &budgets, &db.get_transactions(&filter)?)?;
    let sym = &settings.currency_symbol;

    println!("Budgets for {month}");
    println!(
        "{:<4} {:<20} {:>14} {:>14} {:>8}  Status",
        "ID", "Category", "Used", "Limit", "%"
    );
    println!("{}", rule_line(75));
    for (budget, u) in &usage.rows {
        let status = if u.is_over() {
            format!("over by {}", format_amount(u.over_by, sym))
        } else {
            String::new()
        };
        println!(
            "{:<4} {:<20} {:>14} {:>14} {:>8}  {}",
            budget.id.unwrap_or(0),
            truncate(&category_name(&categories, Some(budget.category_id)), 20),
            format_amount(u.used_amount, sym),
            format_amount(budget.limit_amount, sym),
            format_percent(u.percent),
            status,
        );
    }
    println!("{}", rule_line(75));
    println!(
        "{:<25} {:>14} {:>14} {:>8}",
        "Total",
        format_amount(usage.total_used, sym),
        format_amount(usage.total_limit, sym),
        format_percent(usage.percent()?),
    );
    let over = usage.over_budget().count();
    if over > 0 {
        println!("{over} budget(s) over the limit");
    }
    Ok(())
}

pub(crate) fn delete(db: &mut Database, id: i64) -> Result<()> {
    if !db.delete_budget(id)? {
        bail!("No budget with ID {id}");
    }
    println!("Deleted budget #{id}");
    Ok(())
}
