use anyhow::Result;
use chrono::Months;

use super::util::{category_name, month_arg, rule_line, today, truncate};
use crate::budget::month_usage;
use crate::db::Database;
use crate::invoice::{build_invoice, reference_month};
use crate::models::{Card, CardInvoice, Transaction};
use crate::money::{format_amount, format_percent};
use crate::reports::{
    balance_chart, cash_flow, dashboard_stats, expenses_by_category, income_by_category, Snapshot,
};
use crate::settings::Settings;

/// Stored invoices plus the current and previous invoice of every card,
/// which count as open until their status is changed.
fn collect_invoices(
    db: &Database,
    cards: &[Card],
    transactions: &[Transaction],
) -> Result<Vec<CardInvoice>> {
    let stored = db.get_invoice_statuses()?;
    let mut invoices: Vec<CardInvoice> = stored
        .iter()
        .filter_map(|(card_id, month, status)| {
            let card = cards.iter().find(|c| c.id == Some(*card_id))?;
            build_invoice(card, month, Some(*status), transactions)
        })
        .collect();

    let now = today();
    for card in cards {
        let previous = now.checked_sub_months(Months::new(1)).unwrap_or(now);
        for date in [previous, now] {
            let month = reference_month(date, card.closing_day);
            let known = invoices
                .iter()
                .any(|inv| Some(inv.card_id) == card.id && inv.reference_month == month);
            if !known {
                invoices.extend(build_invoice(card, &month, None, transactions));
            }
        }
    }
    Ok(invoices)
}

pub(crate) fn dashboard(db: &mut Database, settings: &Settings, chart: bool) -> Result<()> {
    let accounts = db.get_accounts()?;
    let categories = db.get_categories()?;
    let transactions = db.get_all_transactions()?;
    let budgets = db.get_budgets(None)?;
    let cards = db.get_cards()?;
    let invoices = collect_invoices(db, &cards, &transactions)?;
    let snapshot = Snapshot {
        accounts: &accounts,
        categories: &categories,
        transactions: &transactions,
        budgets: &budgets,
        cards: &cards,
        invoices: &invoices,
    };
    let stats = dashboard_stats(snapshot, today(), settings.bill_warning_days)?;
    let sym = &settings.currency_symbol;

    println!("Dashboard {}", stats.month);
    println!("{}", rule_line(40));
    println!("{:<22} {:>17}", "Total balance", format_amount(stats.total_balance, sym));
    println!("{:<22} {:>17}", "Income", format_amount(stats.month_income, sym));
    println!("{:<22} {:>17}", "Expenses", format_amount(stats.month_expense, sym));
    println!(
        "{:<22} {:>17}",
        "Budget used",
        format_percent(stats.budget_usage_percent)
    );
    match stats.next_invoice_days {
        Some(0) => println!("{:<22} {:>17}", "Next invoice due", "today"),
        Some(days) => println!("{:<22} {:>17}", "Next invoice due", format!("in {days} days")),
        None => {}
    }

    if !stats.top_expenses.is_empty() {
        println!();
        println!("Top expenses");
        for row in &stats.top_expenses {
            println!(
                "  {:<20} {:>14}",
                truncate(&row.name, 20),
                format_amount(row.amount, sym)
            );
        }
    }

    let usage = month_usage(&stats.month, &budgets, &transactions)?;
    if !usage.rows.is_empty() {
        println!();
        println!("Budgets");
        for (budget, u) in &usage.rows {
            let flag = if u.is_over() { " !" } else { "" };
            println!(
                "  {:<20} {:>14} / {:<14} {:>7}{flag}",
                truncate(&category_name(&categories, Some(budget.category_id)), 20),
                format_amount(u.used_amount, sym),
                format_amount(budget.limit_amount, sym),
                format_percent(u.display_percent()),
            );
        }
    }

    if !stats.upcoming_bills.is_empty() {
        println!();
        println!("Upcoming bills");
        for bill in &stats.upcoming_bills {
            println!(
                "  {:<18} {} due {} ({} days) {:>14}",
                truncate(&bill.card_name, 18),
                bill.reference_month,
                bill.due_date,
                bill.days_left,
                format_amount(bill.total, sym),
            );
        }
    }

    if chart {
        println!();
        println!("Balance");
        for point in balance_chart(&stats.month, &accounts, &transactions) {
            println!(
                "  {} {:>17}",
                point.date.format("%d/%m"),
                format_amount(point.balance, sym)
            );
        }
    }
    Ok(())
}

pub(crate) fn by_category(
    db: &mut Database,
    settings: &Settings,
    month: Option<String>,
    income: bool,
) -> Result<()> {
    let month = month_arg(month)?;
    let categories = db.get_categories()?;
    let transactions = db.get_all_transactions()?;
    let rows = if income {
        income_by_category(&month, &transactions, &categories)
    } else {
        expenses_by_category(&month, &transactions, &categories)
    };
    let title = if income { "Income" } else { "Expenses" };
    if rows.is_empty() {
        println!("No {} in {month}", title.to_lowercase());
        return Ok(());
    }

    let total: rust_decimal::Decimal = rows.iter().map(|r| r.amount).sum();
    println!("{title} by category, {month}");
    println!("{}", rule_line(50));
    for row in &rows {
        let share = row
            .amount
            .checked_div(total)
            .and_then(|q| q.checked_mul(rust_decimal::Decimal::ONE_HUNDRED))
            .unwrap_or_default();
        println!(
            "{:<22} {:>16} {:>8}",
            truncate(&row.name, 22),
            format_amount(row.amount, &settings.currency_symbol),
            format_percent(share),
        );
    }
    println!("{}", rule_line(50));
    println!(
        "{:<22} {:>16}",
        "Total",
        format_amount(total, &settings.currency_symbol)
    );
    Ok(())
}

pub(crate) fn cashflow(
    db: &mut Database,
    settings: &Settings,
    month: Option<String>,
    months: u32,
) -> Result<()> {
    let month = month_arg(month)?;
    let transactions = db.get_all_transactions()?;
    let sym = &settings.currency_symbol;

    println!("{:<8} {:>16} {:>16} {:>16}", "Month", "Income", "Expenses", "Net");
    println!("{}", rule_line(59));
    for row in cash_flow(&month, months, &transactions) {
        println!(
            "{:<8} {:>16} {:>16} {:>16}",
            row.month,
            format_amount(row.income, sym),
            format_amount(row.expense, sym),
            format_amount(row.net, sym),
        );
    }
    Ok(())
}
