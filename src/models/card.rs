use rust_decimal::Decimal;

use crate::error::InvoiceError;

/// A credit card billed through a `card` account.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: Option<i64>,
    pub account_id: i64,
    pub name: String,
    /// Day of month the invoice closes, 1..=31.
    pub closing_day: u32,
    /// Day of month the invoice is due, 1..=31.
    pub due_day: u32,
    pub limit: Decimal,
}

impl Card {
    pub fn new(account_id: i64, name: String, closing_day: u32, due_day: u32, limit: Decimal) -> Self {
        Self {
            id: None,
            account_id,
            name,
            closing_day,
            due_day,
            limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Open,
    Closed,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }

    pub fn close(self) -> Result<Self, InvoiceError> {
        match self {
            Self::Open => Ok(Self::Closed),
            other => Err(InvoiceError::NotOpen(other)),
        }
    }

    pub fn pay(self) -> Result<Self, InvoiceError> {
        match self {
            Self::Closed => Ok(Self::Paid),
            other => Err(InvoiceError::NotClosed(other)),
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardInvoice {
    pub card_id: i64,
    /// Format: "YYYY-MM"
    pub reference_month: String,
    pub status: InvoiceStatus,
    pub total: Decimal,
}
