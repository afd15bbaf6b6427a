use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Bank,
    Wallet,
    Card,
    Cash,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Wallet => "wallet",
            Self::Card => "card",
            Self::Cash => "cash",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bank => "Bank",
            Self::Wallet => "Wallet",
            Self::Card => "Credit Card",
            Self::Cash => "Cash",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bank" | "checking" | "savings" => Some(Self::Bank),
            "wallet" => Some(Self::Wallet),
            "card" | "credit card" | "creditcard" | "credit" => Some(Self::Card),
            "cash" => Some(Self::Cash),
            _ => None,
        }
    }

    pub fn all() -> &'static [AccountType] {
        &[Self::Bank, Self::Wallet, Self::Card, Self::Cash]
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: Option<i64>,
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
    /// Balance before the first recorded transaction.
    pub opening_balance: Decimal,
    pub color: String,
    pub created_at: String,
}

impl Account {
    pub fn new(name: String, account_type: AccountType) -> Self {
        Self {
            id: None,
            name,
            account_type,
            currency: "BRL".to_string(),
            opening_balance: Decimal::ZERO,
            color: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Find an account by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(accounts: &'a [Account], name: &str) -> Option<&'a Account> {
        let lower = name.trim().to_lowercase();
        accounts.iter().find(|a| a.name.to_lowercase() == lower)
    }

    pub fn find_by_id(accounts: &[Account], id: i64) -> Option<&Account> {
        accounts.iter().find(|a| a.id == Some(id))
    }
}
