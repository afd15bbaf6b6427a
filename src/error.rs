use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{InvoiceStatus, PurchaseStatus};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum InvalidRuleError {
    #[error("Rule pattern must have at least {min} characters (got {len})")]
    PatternTooShort { len: usize, min: usize },

    #[error("Rule priority must be between 1 and 100 (got {0})")]
    PriorityOutOfRange(i32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum InvalidBudgetError {
    #[error("Budget limit must be at least 0,01 (got {0})")]
    LimitTooSmall(Decimal),

    #[error("Budget limit must be at most 999.999.999.999,99 (got {0})")]
    LimitTooLarge(Decimal),

    #[error("Invalid budget month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Budget usage for {0} is too large to compute")]
    UsageOverflow(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum InvoiceError {
    #[error("Invoice is {0}, only open invoices can be closed")]
    NotOpen(InvoiceStatus),

    #[error("Invoice is {0}, only closed invoices can be paid")]
    NotClosed(InvoiceStatus),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum PurchaseError {
    #[error("Purchase is already {0}")]
    AlreadyFinal(PurchaseStatus),
}

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldError {
    pub(crate) field: String,
    pub(crate) message: String,
}

/// Every field that failed validation, in form order.
#[derive(Error, Debug, Clone, PartialEq, Eq, Default)]
#[error("{}", render_field_errors(.errors))]
pub(crate) struct FieldErrors {
    pub(crate) errors: Vec<FieldError>,
}

impl FieldErrors {
    pub(crate) fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(value)` when nothing was pushed, otherwise `Err(self)`.
    pub(crate) fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

fn render_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
