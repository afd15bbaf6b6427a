mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

/// Optional filters for listing transactions. Empty means everything.
#[derive(Debug, Default, Clone)]
pub(crate) struct TxnFilter {
    pub(crate) month: Option<String>,
    pub(crate) account_id: Option<i64>,
    pub(crate) category_id: Option<i64>,
    pub(crate) search: Option<String>,
    pub(crate) limit: Option<u32>,
}

const TXN_COLUMNS: &str = "t.id, t.tx_type, t.account_id, t.to_account_id, t.category_id, t.vendor_id,
     t.description, t.amount, t.date, t.payment_method, t.installment_n, t.installments_total,
     t.notes, t.created_at";

fn decimal_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    Ok(Decimal::from_str(&s).unwrap_or_default())
}

/// Text column holding one of a fixed set of keywords.
fn keyword_col<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    parse(&s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown value '{s}'").into(),
        )
    })
}

/// Escape `LIKE` wildcards so the text matches literally under `ESCAPE '\'`.
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn txn_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: Some(row.get(0)?),
        tx_type: keyword_col(row, 1, TxType::parse)?,
        account_id: row.get(2)?,
        to_account_id: row.get(3)?,
        category_id: row.get(4)?,
        vendor_id: row.get(5)?,
        description: row.get(6)?,
        amount: decimal_col(row, 7)?,
        date: row.get(8)?,
        payment_method: row
            .get::<_, Option<String>>(9)?
            .and_then(|s| PaymentMethod::parse(&s)),
        installment_n: row.get(10)?,
        installments_total: row.get(11)?,
        notes: row.get(12)?,
        created_at: row.get(13)?,
    })
}

fn insert_txn_row(conn: &Connection, txn: &Transaction) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO transactions (tx_type, account_id, to_account_id, category_id, vendor_id,
             description, amount, date, payment_method, installment_n, installments_total,
             notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            txn.tx_type.as_str(),
            txn.account_id,
            txn.to_account_id,
            txn.category_id,
            txn.vendor_id,
            txn.description,
            txn.amount.to_string(),
            txn.date,
            txn.payment_method.map(|m| m.as_str()),
            txn.installment_n,
            txn.installments_total,
            txn.notes,
            txn.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        tracing::info!(path = %path.display(), "opened database");
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_default_categories()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            tracing::info!(version = schema::CURRENT_VERSION, "creating schema");
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!(from_version, "applying migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    fn seed_default_categories(&mut self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        for (name, category_type, icon, color) in schema::DEFAULT_CATEGORIES {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name, category_type, icon, color)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, category_type, icon, color],
            )?;
        }
        tx.commit()?;
        tracing::debug!(count = schema::DEFAULT_CATEGORIES.len(), "seeded default categories");
        Ok(())
    }

    // ── Accounts ──────────────────────────────────────────────

    pub(crate) fn insert_account(&self, account: &Account) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO accounts (name, account_type, currency, opening_balance, color, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    account.name,
                    account.account_type.as_str(),
                    account.currency,
                    account.opening_balance.to_string(),
                    account.color,
                    account.created_at,
                ],
            )
            .with_context(|| format!("Failed to insert account '{}'", account.name))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_accounts(&self) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, account_type, currency, opening_balance, color, created_at
             FROM accounts ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Account {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                account_type: keyword_col(row, 2, AccountType::parse)?,
                currency: row.get(3)?,
                opening_balance: decimal_col(row, 4)?,
                color: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, category_type, parent_id, icon, color
             FROM categories ORDER BY category_type, name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                category_type: keyword_col(row, 2, CategoryType::parse)?,
                parent_id: row.get(3)?,
                icon: row.get(4)?,
                color: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn insert_category(&self, cat: &Category) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO categories (name, category_type, parent_id, icon, color)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    cat.name,
                    cat.category_type.as_str(),
                    cat.parent_id,
                    cat.icon,
                    cat.color
                ],
            )
            .with_context(|| format!("Failed to insert category '{}'", cat.name))?;
        Ok(self.conn.last_insert_rowid())
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        Ok(insert_txn_row(&self.conn, txn)?)
    }

    /// Insert all or nothing.
    pub(crate) fn insert_transactions_batch(&mut self, txns: &[Transaction]) -> Result<Vec<i64>> {
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(txns.len());
        for txn in txns {
            ids.push(insert_txn_row(&tx, txn)?);
        }
        tx.commit()?;
        Ok(ids)
    }

    /// Transactions matching every set filter, newest first. `search` is a
    /// literal, case-insensitive substring of the description or notes.
    pub(crate) fn get_transactions(&self, filter: &TxnFilter) -> Result<Vec<Transaction>> {
        let mut sql = format!("SELECT {TXN_COLUMNS} FROM transactions t WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(aid) = filter.account_id {
            sql.push_str(&format!(
                " AND (t.account_id = ?{0} OR t.to_account_id = ?{0})",
                param_values.len() + 1
            ));
            param_values.push(Box::new(aid));
        }
        if let Some(cid) = filter.category_id {
            sql.push_str(&format!(" AND t.category_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(cid));
        }
        if let Some(s) = &filter.search {
            sql.push_str(&format!(
                " AND (t.description LIKE ?{0} ESCAPE '\\' OR t.notes LIKE ?{0} ESCAPE '\\')",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{}%", escape_like(s))));
        }
        if let Some(m) = &filter.month {
            sql.push_str(&format!(" AND t.date LIKE ?{}", param_values.len() + 1));
            param_values.push(Box::new(format!("{m}%")));
        }

        sql.push_str(" ORDER BY t.date DESC, t.id DESC");

        if let Some(l) = filter.limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), txn_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_all_transactions(&self) -> Result<Vec<Transaction>> {
        self.get_transactions(&TxnFilter::default())
    }

    pub(crate) fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            &format!("SELECT {TXN_COLUMNS} FROM transactions t WHERE t.id = ?1"),
            params![id],
            txn_from_row,
        );
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Expense and income transactions still waiting for a category.
    pub(crate) fn get_uncategorized_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TXN_COLUMNS} FROM transactions t
             WHERE t.category_id IS NULL AND t.tx_type IN ('expense', 'income')
             ORDER BY t.date, t.id"
        ))?;
        let rows = stmt.query_map([], txn_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Most recently used distinct descriptions, newest first.
    pub(crate) fn get_recent_descriptions(&self, limit: u32) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT description FROM transactions
             GROUP BY description
             ORDER BY MAX(date) DESC, MAX(id) DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn update_transaction_category(
        &self,
        transaction_id: i64,
        category_id: Option<i64>,
    ) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE transactions SET category_id = ?1 WHERE id = ?2",
            params![category_id, transaction_id],
        )?;
        Ok(changed > 0)
    }

    /// Store categories assigned in bulk, in one transaction.
    pub(crate) fn update_categories_batch(&mut self, txns: &[Transaction]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut count = 0;
        for txn in txns {
            let (Some(id), Some(category_id)) = (txn.id, txn.category_id) else {
                continue;
            };
            count += tx.execute(
                "UPDATE transactions SET category_id = ?1 WHERE id = ?2",
                params![category_id, id],
            )?;
        }
        tx.commit()?;
        Ok(count)
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Budgets of one month, or of every month when `month` is `None`.
    pub(crate) fn get_budgets(&self, month: Option<&str>) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category_id, month, limit_amount FROM budgets
             WHERE ?1 IS NULL OR month = ?1
             ORDER BY month, category_id",
        )?;
        let rows = stmt.query_map(params![month], |row| {
            Ok(Budget {
                id: Some(row.get(0)?),
                category_id: row.get(1)?,
                month: row.get(2)?,
                limit_amount: decimal_col(row, 3)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Insert, or replace the limit of the existing (category, month) budget.
    pub(crate) fn upsert_budget(&self, budget: &Budget) -> Result<i64> {
        let id = self.conn.query_row(
            "INSERT INTO budgets (category_id, month, limit_amount)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(category_id, month) DO UPDATE SET limit_amount = excluded.limit_amount
             RETURNING id",
            params![
                budget.category_id,
                budget.month,
                budget.limit_amount.to_string()
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    pub(crate) fn delete_budget(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM budgets WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // ── Rules ─────────────────────────────────────────────────

    pub(crate) fn get_rules(&self) -> Result<Vec<Rule>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, contains, category_id, priority FROM rules
             ORDER BY priority DESC, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Rule {
                id: Some(row.get(0)?),
                contains: row.get(1)?,
                category_id: row.get(2)?,
                priority: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_rule(&self, id: i64) -> Result<Option<Rule>> {
        Ok(self.get_rules()?.into_iter().find(|r| r.id == Some(id)))
    }

    pub(crate) fn insert_rule(&self, rule: &Rule) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO rules (contains, category_id, priority) VALUES (?1, ?2, ?3)",
            params![rule.contains, rule.category_id, rule.priority],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn update_rule(&self, rule: &Rule) -> Result<bool> {
        let Some(id) = rule.id else {
            anyhow::bail!("Cannot update a rule that was never saved");
        };
        let changed = self.conn.execute(
            "UPDATE rules SET contains = ?1, category_id = ?2, priority = ?3 WHERE id = ?4",
            params![rule.contains, rule.category_id, rule.priority, id],
        )?;
        Ok(changed > 0)
    }

    pub(crate) fn delete_rule(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM rules WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // ── Cards & invoices ──────────────────────────────────────

    pub(crate) fn get_cards(&self) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account_id, name, closing_day, due_day, limit_amount
             FROM cards ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Card {
                id: Some(row.get(0)?),
                account_id: row.get(1)?,
                name: row.get(2)?,
                closing_day: row.get(3)?,
                due_day: row.get(4)?,
                limit: decimal_col(row, 5)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn insert_card(&self, card: &Card) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO cards (account_id, name, closing_day, due_day, limit_amount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                card.account_id,
                card.name,
                card.closing_day,
                card.due_day,
                card.limit.to_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Stored invoice statuses as (card_id, reference_month, status).
    pub(crate) fn get_invoice_statuses(&self) -> Result<Vec<(i64, String, InvoiceStatus)>> {
        let mut stmt = self.conn.prepare(
            "SELECT card_id, reference_month, status FROM card_invoices
             ORDER BY reference_month, card_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                keyword_col(row, 2, InvoiceStatus::parse)?,
            ))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Status of one invoice; never-stored invoices are open.
    pub(crate) fn get_invoice_status(&self, card_id: i64, month: &str) -> Result<InvoiceStatus> {
        Ok(self
            .get_invoice_statuses()?
            .into_iter()
            .find(|(c, m, _)| *c == card_id && m == month)
            .map_or(InvoiceStatus::Open, |(_, _, s)| s))
    }

    pub(crate) fn set_invoice_status(
        &self,
        card_id: i64,
        month: &str,
        status: InvoiceStatus,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO card_invoices (card_id, reference_month, status)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(card_id, reference_month) DO UPDATE SET status = excluded.status",
            params![card_id, month, status.as_str()],
        )?;
        Ok(())
    }

    // ── Vendors ───────────────────────────────────────────────

    pub(crate) fn get_vendors(&self) -> Result<Vec<Vendor>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, cnpj FROM vendors ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Vendor {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                cnpj: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn insert_vendor(&self, vendor: &Vendor) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO vendors (name, cnpj) VALUES (?1, ?2)",
            params![vendor.name, vendor.cnpj],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // ── Purchases ─────────────────────────────────────────────

    pub(crate) fn insert_purchase(&mut self, purchase: &Purchase) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO purchases (vendor_id, status, expected_date, received_date, total_estimated, total_real)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                purchase.vendor_id,
                purchase.status.as_str(),
                purchase.expected_date,
                purchase.received_date,
                purchase.total_estimated.to_string(),
                purchase.total_real.map(|d| d.to_string()),
            ],
        )?;
        let purchase_id = tx.last_insert_rowid();
        for item in &purchase.items {
            tx.execute(
                "INSERT INTO purchase_items (purchase_id, item_name, qty, unit_price)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    purchase_id,
                    item.item_name,
                    item.qty,
                    item.unit_price.to_string()
                ],
            )?;
        }
        tx.commit()?;
        Ok(purchase_id)
    }

    fn get_purchase_items(&self, purchase_id: i64) -> Result<Vec<PurchaseItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, item_name, qty, unit_price FROM purchase_items
             WHERE purchase_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![purchase_id], |row| {
            Ok(PurchaseItem {
                id: Some(row.get(0)?),
                item_name: row.get(1)?,
                qty: row.get(2)?,
                unit_price: decimal_col(row, 3)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_purchases(&self) -> Result<Vec<Purchase>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, vendor_id, status, expected_date, received_date, total_estimated, total_real
             FROM purchases ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Purchase {
                id: Some(row.get(0)?),
                vendor_id: row.get(1)?,
                status: keyword_col(row, 2, PurchaseStatus::parse)?,
                expected_date: row.get(3)?,
                received_date: row.get(4)?,
                total_estimated: decimal_col(row, 5)?,
                total_real: row
                    .get::<_, Option<String>>(6)?
                    .and_then(|s| Decimal::from_str(&s).ok()),
                items: Vec::new(),
            })
        })?;
        let mut purchases = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        for purchase in &mut purchases {
            if let Some(id) = purchase.id {
                purchase.items = self.get_purchase_items(id)?;
            }
        }
        Ok(purchases)
    }

    pub(crate) fn update_purchase(&self, purchase: &Purchase) -> Result<bool> {
        let Some(id) = purchase.id else {
            anyhow::bail!("Cannot update a purchase that was never saved");
        };
        let changed = self.conn.execute(
            "UPDATE purchases SET status = ?1, received_date = ?2, total_real = ?3 WHERE id = ?4",
            params![
                purchase.status.as_str(),
                purchase.received_date,
                purchase.total_real.map(|d| d.to_string()),
                id
            ],
        )?;
        Ok(changed > 0)
    }

    // ── Recurrences ───────────────────────────────────────────

    pub(crate) fn insert_recurrence(&self, rec: &Recurrence) -> Result<i64> {
        let t = &rec.template;
        self.conn.execute(
            "INSERT INTO recurrences (tx_type, account_id, to_account_id, category_id, description,
                 amount, payment_method, freq, next_run_at, end_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                t.tx_type.as_str(),
                t.account_id,
                t.to_account_id,
                t.category_id,
                t.description,
                t.amount.to_string(),
                t.payment_method.map(|m| m.as_str()),
                rec.freq.as_str(),
                rec.next_run_at,
                rec.end_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_recurrences(&self) -> Result<Vec<Recurrence>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, tx_type, account_id, to_account_id, category_id, description, amount,
                    payment_method, freq, next_run_at, end_at
             FROM recurrences ORDER BY next_run_at, id",
        )?;
        let rows = stmt.query_map([], |row| {
            let mut template = Transaction::new(
                keyword_col(row, 1, TxType::parse)?,
                row.get(2)?,
                row.get(5)?,
                decimal_col(row, 6)?,
                row.get(9)?,
            );
            template.to_account_id = row.get(3)?;
            template.category_id = row.get(4)?;
            template.payment_method = row
                .get::<_, Option<String>>(7)?
                .and_then(|s| PaymentMethod::parse(&s));
            Ok(Recurrence {
                id: Some(row.get(0)?),
                template,
                freq: keyword_col(row, 8, Frequency::parse)?,
                next_run_at: row.get(9)?,
                end_at: row.get(10)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Store the generated occurrences and move the recurrence forward, atomically.
    pub(crate) fn record_recurrence_run(
        &mut self,
        recurrence_id: i64,
        occurrences: &[Transaction],
        next_run_at: &str,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        for txn in occurrences {
            insert_txn_row(&tx, txn)?;
        }
        tx.execute(
            "UPDATE recurrences SET next_run_at = ?1 WHERE id = ?2",
            params![next_run_at, recurrence_id],
        )?;
        tx.commit()?;
        Ok(())
    }
}
