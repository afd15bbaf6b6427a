use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxType {
    Expense,
    Income,
    Transfer,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "despesa" => Some(Self::Expense),
            "income" | "receita" => Some(Self::Income),
            "transfer" | "transferencia" | "transferência" => Some(Self::Transfer),
            _ => None,
        }
    }

    /// Whether transactions of this type carry a category.
    pub fn is_categorized(&self) -> bool {
        matches!(self, Self::Expense | Self::Income)
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Pix,
    Credit,
    Debit,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Cash => "cash",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pix" => Some(Self::Pix),
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            "cash" => Some(Self::Cash),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Option<i64>,
    pub tx_type: TxType,
    pub account_id: i64,
    /// Destination account, transfers only.
    pub to_account_id: Option<i64>,
    /// Always `None` for transfers.
    pub category_id: Option<i64>,
    pub vendor_id: Option<i64>,
    pub description: String,
    /// Always positive; the direction comes from `tx_type`.
    pub amount: Decimal,
    /// Format: "YYYY-MM-DD"
    pub date: String,
    pub payment_method: Option<PaymentMethod>,
    pub installment_n: Option<u32>,
    pub installments_total: Option<u32>,
    pub notes: String,
    pub created_at: String,
}

impl Transaction {
    pub fn new(
        tx_type: TxType,
        account_id: i64,
        description: String,
        amount: Decimal,
        date: String,
    ) -> Self {
        Self {
            id: None,
            tx_type,
            account_id,
            to_account_id: None,
            category_id: None,
            vendor_id: None,
            description,
            amount,
            date,
            payment_method: None,
            installment_n: None,
            installments_total: None,
            notes: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_expense(&self) -> bool {
        self.tx_type == TxType::Expense
    }

    pub fn is_transfer(&self) -> bool {
        self.tx_type == TxType::Transfer
    }

    /// The "YYYY-MM" part of the date.
    pub fn month(&self) -> &str {
        self.date.get(..7).unwrap_or("")
    }

    pub fn in_month(&self, month: &str) -> bool {
        self.month() == month
    }

    /// How this transaction moves the balance of `account_id`.
    pub fn balance_effect(&self, account_id: i64) -> Decimal {
        match self.tx_type {
            TxType::Income if self.account_id == account_id => self.amount,
            TxType::Expense if self.account_id == account_id => -self.amount,
            TxType::Transfer if self.account_id == account_id => -self.amount,
            TxType::Transfer if self.to_account_id == Some(account_id) => self.amount,
            _ => Decimal::ZERO,
        }
    }
}
