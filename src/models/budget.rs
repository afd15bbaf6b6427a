use rust_decimal::Decimal;

use crate::error::InvalidBudgetError;
use crate::money::{round_cents, MAX_AMOUNT, MIN_AMOUNT};

#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: Option<i64>,
    pub category_id: i64,
    /// Format: "YYYY-MM"
    pub month: String,
    pub limit_amount: Decimal,
}

impl Budget {
    /// The limit is rounded to cents and must land in `MIN_AMOUNT..=MAX_AMOUNT`.
    pub fn new(
        category_id: i64,
        month: String,
        limit_amount: Decimal,
    ) -> Result<Self, InvalidBudgetError> {
        let limit_amount = Self::check_limit(limit_amount)?;
        if !crate::validate::is_month_key(&month) {
            return Err(InvalidBudgetError::InvalidMonth(month));
        }
        Ok(Self {
            id: None,
            category_id,
            month,
            limit_amount,
        })
    }

    /// Rounded limit, or the reason it can't be budgeted against.
    pub fn check_limit(limit: Decimal) -> Result<Decimal, InvalidBudgetError> {
        let rounded = round_cents(limit);
        if rounded < MIN_AMOUNT {
            return Err(InvalidBudgetError::LimitTooSmall(limit));
        }
        if rounded > MAX_AMOUNT {
            return Err(InvalidBudgetError::LimitTooLarge(limit));
        }
        Ok(rounded)
    }
}
