pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS accounts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL UNIQUE,
    account_type    TEXT NOT NULL DEFAULT 'bank',
    currency        TEXT NOT NULL DEFAULT 'BRL',
    opening_balance TEXT NOT NULL DEFAULT '0',
    color           TEXT NOT NULL DEFAULT '',
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL UNIQUE,
    category_type TEXT NOT NULL DEFAULT 'expense',
    parent_id     INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    icon          TEXT NOT NULL DEFAULT '',
    color         TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS vendors (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    cnpj TEXT
);

CREATE TABLE IF NOT EXISTS transactions (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    tx_type            TEXT NOT NULL,
    account_id         INTEGER NOT NULL REFERENCES accounts(id),
    to_account_id      INTEGER REFERENCES accounts(id),
    category_id        INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    vendor_id          INTEGER REFERENCES vendors(id) ON DELETE SET NULL,
    description        TEXT NOT NULL,
    amount             TEXT NOT NULL,
    date               TEXT NOT NULL,
    payment_method     TEXT,
    installment_n      INTEGER,
    installments_total INTEGER,
    notes              TEXT NOT NULL DEFAULT '',
    created_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id);
CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);

CREATE TABLE IF NOT EXISTS budgets (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id   INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    month         TEXT NOT NULL,
    limit_amount  TEXT NOT NULL,
    UNIQUE(category_id, month)
);

CREATE TABLE IF NOT EXISTS rules (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    contains    TEXT NOT NULL,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    priority    INTEGER NOT NULL DEFAULT 50
);

CREATE TABLE IF NOT EXISTS cards (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id   INTEGER NOT NULL REFERENCES accounts(id),
    name         TEXT NOT NULL,
    closing_day  INTEGER NOT NULL,
    due_day      INTEGER NOT NULL,
    limit_amount TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS card_invoices (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    card_id         INTEGER NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
    reference_month TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'open',
    UNIQUE(card_id, reference_month)
);

CREATE TABLE IF NOT EXISTS purchases (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    vendor_id       INTEGER NOT NULL REFERENCES vendors(id),
    status          TEXT NOT NULL DEFAULT 'requested',
    expected_date   TEXT,
    received_date   TEXT,
    total_estimated TEXT NOT NULL,
    total_real      TEXT
);

CREATE TABLE IF NOT EXISTS purchase_items (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    purchase_id INTEGER NOT NULL REFERENCES purchases(id) ON DELETE CASCADE,
    item_name   TEXT NOT NULL,
    qty         INTEGER NOT NULL,
    unit_price  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS recurrences (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    tx_type        TEXT NOT NULL,
    account_id     INTEGER NOT NULL REFERENCES accounts(id),
    to_account_id  INTEGER REFERENCES accounts(id),
    category_id    INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    description    TEXT NOT NULL,
    amount         TEXT NOT NULL,
    payment_method TEXT,
    freq           TEXT NOT NULL,
    next_run_at    TEXT NOT NULL,
    end_at         TEXT
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1, as (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];

/// Seeded on first open: (name, type, icon, color).
pub(crate) const DEFAULT_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("Food", "expense", "🍽️", "#F59E0B"),
    ("Transport", "expense", "🚗", "#3B82F6"),
    ("Housing", "expense", "🏠", "#8B5CF6"),
    ("Leisure", "expense", "🎮", "#EC4899"),
    ("Health", "expense", "💊", "#EF4444"),
    ("Education", "expense", "📚", "#06B6D4"),
    ("Salary", "income", "💰", "#10B981"),
    ("Freelance", "income", "💼", "#14B8A6"),
    ("Investments", "income", "📈", "#6366F1"),
];
