use rust_decimal::Decimal;

use crate::error::PurchaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStatus {
    Requested,
    Received,
    Invoiced,
    Paid,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Received => "received",
            Self::Invoiced => "invoiced",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "requested" => Some(Self::Requested),
            "received" => Some(Self::Received),
            "invoiced" => Some(Self::Invoiced),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Requested => Some(Self::Received),
            Self::Received => Some(Self::Invoiced),
            Self::Invoiced => Some(Self::Paid),
            Self::Paid => None,
        }
    }
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseItem {
    pub id: Option<i64>,
    pub item_name: String,
    pub qty: u32,
    pub unit_price: Decimal,
}

impl PurchaseItem {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.qty) * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub id: Option<i64>,
    pub vendor_id: i64,
    pub status: PurchaseStatus,
    /// Format: "YYYY-MM-DD"
    pub expected_date: Option<String>,
    pub received_date: Option<String>,
    pub total_estimated: Decimal,
    pub total_real: Option<Decimal>,
    pub items: Vec<PurchaseItem>,
}

impl Purchase {
    pub fn new(vendor_id: i64, expected_date: Option<String>, items: Vec<PurchaseItem>) -> Self {
        let total_estimated = items.iter().map(PurchaseItem::line_total).sum();
        Self {
            id: None,
            vendor_id,
            status: PurchaseStatus::Requested,
            expected_date,
            received_date: None,
            total_estimated,
            total_real: None,
            items,
        }
    }

    /// Move to the next status. Receiving stamps `received_date` with `today`.
    pub fn advance(&mut self, today: &str) -> Result<PurchaseStatus, PurchaseError> {
        let next = self
            .status
            .next()
            .ok_or(PurchaseError::AlreadyFinal(self.status))?;
        if next == PurchaseStatus::Received {
            self.received_date = Some(today.to_string());
        }
        self.status = next;
        Ok(next)
    }
}
