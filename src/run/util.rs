use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use crate::models::{Account, Card, Category, Vendor};
use crate::validate::{is_month_key, parse_iso_date};

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max - 1).collect();
    format!("{truncated}…")
}

pub(crate) fn rule_line(width: usize) -> String {
    "─".repeat(width)
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `YYYY-MM` argument, defaulting to the current month.
pub(crate) fn month_arg(month: Option<String>) -> Result<String> {
    match month {
        Some(m) if is_month_key(m.trim()) => Ok(m.trim().to_string()),
        Some(m) => bail!("Invalid month '{m}', expected YYYY-MM"),
        None => Ok(today().format("%Y-%m").to_string()),
    }
}

/// `YYYY-MM-DD` argument, defaulting to today.
pub(crate) fn date_arg(date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(d) => parse_iso_date(d.trim())
            .with_context(|| format!("Invalid date '{d}', expected YYYY-MM-DD")),
        None => Ok(today()),
    }
}

/// Find an item by numeric ID or case-insensitive name.
fn lookup<'a, T>(
    items: &'a [T],
    key: &str,
    what: &str,
    id_of: impl Fn(&T) -> Option<i64>,
    name_of: impl Fn(&T) -> &str,
) -> Result<&'a T> {
    let key = key.trim();
    let found = match key.parse::<i64>() {
        Ok(id) => items.iter().find(|item| id_of(item) == Some(id)),
        Err(_) => {
            let lower = key.to_lowercase();
            items.iter().find(|item| name_of(item).to_lowercase() == lower)
        }
    };
    found.with_context(|| format!("Unknown {what} '{key}'"))
}

pub(crate) fn find_account<'a>(accounts: &'a [Account], key: &str) -> Result<&'a Account> {
    lookup(accounts, key, "account", |a| a.id, |a| a.name.as_str())
}

pub(crate) fn find_category<'a>(categories: &'a [Category], key: &str) -> Result<&'a Category> {
    lookup(categories, key, "category", |c| c.id, |c| c.name.as_str())
}

pub(crate) fn find_vendor<'a>(vendors: &'a [Vendor], key: &str) -> Result<&'a Vendor> {
    lookup(vendors, key, "vendor", |v| v.id, |v| v.name.as_str())
}

pub(crate) fn find_card<'a>(cards: &'a [Card], key: &str) -> Result<&'a Card> {
    lookup(cards, key, "card", |c| c.id, |c| c.name.as_str())
}

/// Account for a new transaction: the one asked for, else the configured
/// default, else the only account there is.
pub(crate) fn default_account<'a>(
    accounts: &'a [Account],
    requested: Option<&str>,
    configured: Option<&str>,
) -> Result<&'a Account> {
    if let Some(key) = requested.or(configured) {
        return find_account(accounts, key);
    }
    match accounts {
        [only] => Ok(only),
        [] => bail!("No accounts yet. Add one with `casafin accounts add <name>`"),
        _ => bail!("Several accounts exist, pick one with --account"),
    }
}

pub(crate) fn category_name(categories: &[Category], id: Option<i64>) -> String {
    id.and_then(|id| Category::find_by_id(categories, id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
#[path = "util_tests.rs"]
mod tests;
