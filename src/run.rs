mod accounts;
mod budgets;
mod cards;
mod categories;
mod purchases;
mod recurrences;
mod reports;
mod rules;
mod transactions;
mod util;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::db::Database;
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "casafin",
    version,
    about = "Household finance tracker: transactions, budgets, cards and auto-categorization rules."
)]
pub(crate) struct Cli {
    /// Database file (default: platform data directory)
    #[arg(long, global = true, env = "CASAFIN_DB")]
    pub(crate) db: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Manage accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Record and browse transactions.
    Txn {
        #[command(subcommand)]
        command: TxnCommands,
    },
    /// Manage auto-categorization rules.
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
    /// Monthly category budgets.
    Budgets {
        #[command(subcommand)]
        command: BudgetsCommands,
    },
    /// Credit cards and their invoices.
    Cards {
        #[command(subcommand)]
        command: CardsCommands,
    },
    /// Vendors for purchases and transactions.
    Vendors {
        #[command(subcommand)]
        command: VendorsCommands,
    },
    /// Purchase orders.
    Purchases {
        #[command(subcommand)]
        command: PurchasesCommands,
    },
    /// Recurring transactions.
    Recurrences {
        #[command(subcommand)]
        command: RecurrencesCommands,
    },
    /// Month overview: balance, income, expenses, budgets and upcoming bills.
    Dashboard {
        /// Show the daily balance chart
        #[arg(long)]
        chart: bool,
    },
    /// Reports by category and over time.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Export transactions to CSV.
    Export {
        /// Output file (default: stdout)
        output: Option<PathBuf>,
        /// Only this month: YYYY-MM
        #[arg(long)]
        month: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum AccountsCommands {
    /// Add an account.
    Add {
        name: String,
        /// bank, wallet, card or cash
        #[arg(long = "type", default_value = "bank")]
        account_type: String,
        /// Balance before the first transaction, e.g. "1.250,00"
        #[arg(long, allow_hyphen_values = true)]
        opening: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// List accounts with their current balance.
    List,
}

#[derive(Subcommand)]
pub(crate) enum CategoriesCommands {
    /// Add a category.
    Add {
        name: String,
        /// expense or income
        #[arg(long = "type", default_value = "expense")]
        category_type: String,
        /// Parent category name or ID
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// List categories.
    List,
}

#[derive(Subcommand)]
pub(crate) enum TxnCommands {
    /// Record a transaction. Uncategorized ones are matched against the rules.
    Add {
        description: String,
        /// Amount, e.g. "45,90" or "R$ 1.234,56"
        amount: String,
        /// expense, income or transfer
        #[arg(long = "type", default_value = "expense")]
        tx_type: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Account name or ID (default: settings, or the only account)
        #[arg(long)]
        account: Option<String>,
        /// Destination account for transfers
        #[arg(long)]
        to: Option<String>,
        /// Category name or ID
        #[arg(long)]
        category: Option<String>,
        /// Vendor name or ID
        #[arg(long)]
        vendor: Option<String>,
        /// pix, credit, debit or cash
        #[arg(long)]
        method: Option<String>,
        /// Split into this many monthly installments
        #[arg(long)]
        installments: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List transactions, newest first.
    List {
        /// YYYY-MM
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "50")]
        limit: u32,
    },
    /// Change the category of a transaction.
    Recat {
        id: i64,
        /// Category name or ID
        category: String,
    },
    /// Delete a transaction.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub(crate) enum RulesCommands {
    /// Add a rule: descriptions containing PATTERN get CATEGORY.
    Add {
        pattern: String,
        /// Category name or ID
        #[arg(long)]
        category: String,
        /// 1-100, higher wins
        #[arg(long, default_value_t = crate::models::DEFAULT_PRIORITY)]
        priority: i32,
    },
    /// Change a rule.
    Edit {
        id: i64,
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        priority: Option<i32>,
    },
    /// List rules in the order they are tried.
    List,
    /// Delete a rule.
    Delete { id: i64 },
    /// Preview which descriptions a pattern would match.
    Test {
        pattern: String,
        /// Descriptions to test (default: recent transaction descriptions)
        samples: Vec<String>,
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Categorize stored transactions that have no category yet.
    Apply,
}

#[derive(Subcommand)]
pub(crate) enum BudgetsCommands {
    /// Set the limit of a category for a month.
    Set {
        /// Category name or ID
        category: String,
        /// Limit, e.g. "800,00"
        limit: String,
        /// YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Budgets of a month with their usage.
    List {
        #[arg(long)]
        month: Option<String>,
    },
    /// Delete a budget.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub(crate) enum CardsCommands {
    /// Add a credit card billed through a card account.
    Add {
        name: String,
        /// Card account name or ID
        #[arg(long)]
        account: String,
        /// Day of month the invoice closes
        #[arg(long)]
        closing: u32,
        /// Day of month the invoice is due
        #[arg(long)]
        due: u32,
        #[arg(long)]
        limit: String,
    },
    /// List cards with their current invoice.
    List,
    /// Show an invoice and its transactions.
    Invoice {
        /// Card name or ID
        card: String,
        /// Reference month YYYY-MM (default: the open invoice)
        #[arg(long)]
        month: Option<String>,
    },
    /// Close an open invoice.
    Close {
        card: String,
        #[arg(long)]
        month: Option<String>,
    },
    /// Mark a closed invoice as paid.
    Pay {
        card: String,
        #[arg(long)]
        month: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum VendorsCommands {
    /// Add a vendor.
    Add {
        name: String,
        #[arg(long)]
        cnpj: Option<String>,
    },
    /// Search vendors by name (all when no query).
    Search { query: Option<String> },
}

#[derive(Subcommand)]
pub(crate) enum PurchasesCommands {
    /// Request a purchase.
    Add {
        /// Vendor name or ID
        #[arg(long)]
        vendor: String,
        /// Expected delivery date YYYY-MM-DD
        #[arg(long)]
        expected: Option<String>,
        /// Item as NAME:QTY:UNIT_PRICE, repeatable
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
    /// List purchases.
    List,
    /// Move a purchase to its next status.
    Advance {
        id: i64,
        /// Real total, recorded when given
        #[arg(long)]
        total: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum RecurrencesCommands {
    /// Repeat a transaction on a schedule.
    Add {
        description: String,
        amount: String,
        #[arg(long = "type", default_value = "expense")]
        tx_type: String,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// weekly, monthly or yearly
        #[arg(long, default_value = "monthly")]
        freq: String,
        /// First occurrence YYYY-MM-DD (default: today)
        #[arg(long)]
        start: Option<String>,
        /// Last possible occurrence YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,
    },
    /// List recurrences.
    List,
    /// Record every occurrence due up to a date.
    Run {
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ReportCommands {
    /// Expenses by category.
    Expenses {
        #[arg(long)]
        month: Option<String>,
    },
    /// Income by category.
    Income {
        #[arg(long)]
        month: Option<String>,
    },
    /// Income, expenses and net per month.
    Cashflow {
        /// Last month of the report (default: current month)
        #[arg(long)]
        month: Option<String>,
        #[arg(long, default_value = "6")]
        months: u32,
    },
}

pub(crate) fn execute(command: Commands, db: &mut Database, settings: &Settings) -> Result<()> {
    match command {
        Commands::Accounts { command } => match command {
            AccountsCommands::Add {
                name,
                account_type,
                opening,
                color,
            } => accounts::add(db, name, account_type, opening, color),
            AccountsCommands::List => accounts::list(db, settings),
        },
        Commands::Categories { command } => match command {
            CategoriesCommands::Add {
                name,
                category_type,
                parent,
                icon,
                color,
            } => categories::add(db, name, &category_type, parent, icon, color),
            CategoriesCommands::List => categories::list(db),
        },
        Commands::Txn { command } => match command {
            TxnCommands::Add {
                description,
                amount,
                tx_type,
                date,
                account,
                to,
                category,
                vendor,
                method,
                installments,
                notes,
            } => {
                let args = transactions::AddArgs {
                    description,
                    amount,
                    tx_type,
                    date,
                    account,
                    to,
                    category,
                    vendor,
                    method,
                    installments,
                    notes,
                };
                transactions::add(db, settings, args)
            }
            TxnCommands::List {
                month,
                account,
                category,
                search,
                limit,
            } => transactions::list(db, settings, month, account, category, search, limit),
            TxnCommands::Recat { id, category } => transactions::recategorize(db, id, &category),
            TxnCommands::Delete { id } => transactions::delete(db, id),
        },
        Commands::Rules { command } => match command {
            RulesCommands::Add {
                pattern,
                category,
                priority,
            } => rules::add(db, &pattern, &category, priority),
            RulesCommands::Edit {
                id,
                pattern,
                category,
                priority,
            } => rules::edit(db, id, pattern, category, priority),
            RulesCommands::List => rules::list(db),
            RulesCommands::Delete { id } => rules::delete(db, id),
            RulesCommands::Test {
                pattern,
                samples,
                limit,
            } => rules::test(db, &pattern, samples, limit),
            RulesCommands::Apply => rules::apply(db),
        },
        Commands::Budgets { command } => match command {
            BudgetsCommands::Set {
                category,
                limit,
                month,
            } => budgets::set(db, &category, limit, month),
            BudgetsCommands::List { month } => budgets::list(db, settings, month),
            BudgetsCommands::Delete { id } => budgets::delete(db, id),
        },
        Commands::Cards { command } => match command {
            CardsCommands::Add {
                name,
                account,
                closing,
                due,
                limit,
            } => cards::add(db, name, &account, closing, due, limit),
            CardsCommands::List => cards::list(db, settings),
            CardsCommands::Invoice { card, month } => cards::invoice(db, settings, &card, month),
            CardsCommands::Close { card, month } => cards::close(db, &card, month),
            CardsCommands::Pay { card, month } => cards::pay(db, &card, month),
        },
        Commands::Vendors { command } => match command {
            VendorsCommands::Add { name, cnpj } => purchases::add_vendor(db, name, cnpj),
            VendorsCommands::Search { query } => purchases::search_vendors(db, query),
        },
        Commands::Purchases { command } => match command {
            PurchasesCommands::Add {
                vendor,
                expected,
                items,
            } => purchases::add(db, settings, &vendor, expected, &items),
            PurchasesCommands::List => purchases::list(db, settings),
            PurchasesCommands::Advance { id, total } => purchases::advance(db, settings, id, total),
        },
        Commands::Recurrences { command } => match command {
            RecurrencesCommands::Add {
                description,
                amount,
                tx_type,
                account,
                to,
                category,
                freq,
                start,
                end,
            } => {
                let args = recurrences::AddArgs {
                    description,
                    amount,
                    tx_type,
                    account,
                    to,
                    category,
                    freq,
                    start,
                    end,
                };
                recurrences::add(db, settings, args)
            }
            RecurrencesCommands::List => recurrences::list(db, settings),
            RecurrencesCommands::Run { date } => recurrences::run(db, date),
        },
        Commands::Dashboard { chart } => reports::dashboard(db, settings, chart),
        Commands::Report { command } => match command {
            ReportCommands::Expenses { month } => reports::by_category(db, settings, month, false),
            ReportCommands::Income { month } => reports::by_category(db, settings, month, true),
            ReportCommands::Cashflow { month, months } => {
                reports::cashflow(db, settings, month, months)
            }
        },
        Commands::Export { output, month } => transactions::export(db, output, month),
    }
}
