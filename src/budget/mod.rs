use rust_decimal::Decimal;

use crate::error::InvalidBudgetError;
use crate::models::{Budget, Transaction};
use crate::money::round_cents;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetUsage {
    pub(crate) used_amount: Decimal,
    /// `used / limit * 100`, not clamped: over-budget reads above 100.
    pub(crate) percent: Decimal,
    pub(crate) over_by: Decimal,
}

impl BudgetUsage {
    /// Percent clamped to 0..=100 for progress bars.
    pub(crate) fn display_percent(&self) -> Decimal {
        self.percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    pub(crate) fn is_over(&self) -> bool {
        self.over_by > Decimal::ZERO
    }
}

/// `part / whole * 100`, or `None` when the result does not fit a decimal.
fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// Sum of the month's expenses in the budget's category, against its limit.
pub(crate) fn compute_usage(
    budget: &Budget,
    transactions: &[Transaction],
) -> Result<BudgetUsage, InvalidBudgetError> {
    let limit = Budget::check_limit(budget.limit_amount)?;
    let overflow = || InvalidBudgetError::UsageOverflow(budget.month.clone());

    let used = transactions
        .iter()
        .filter(|t| {
            t.is_expense()
                && t.category_id == Some(budget.category_id)
                && t.in_month(&budget.month)
        })
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.amount))
        .ok_or_else(overflow)?;
    let used_amount = round_cents(used);

    Ok(BudgetUsage {
        used_amount,
        percent: percent_of(used_amount, limit).ok_or_else(overflow)?,
        over_by: (used_amount - limit).max(Decimal::ZERO),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthUsage {
    pub(crate) month: String,
    pub(crate) rows: Vec<(Budget, BudgetUsage)>,
    pub(crate) total_limit: Decimal,
    pub(crate) total_used: Decimal,
}

impl MonthUsage {
    /// Overall usage across every budget, 0 when there are none.
    pub(crate) fn percent(&self) -> Result<Decimal, InvalidBudgetError> {
        if self.total_limit <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        percent_of(self.total_used, self.total_limit)
            .ok_or_else(|| InvalidBudgetError::UsageOverflow(self.month.clone()))
    }

    pub(crate) fn over_budget(&self) -> impl Iterator<Item = &(Budget, BudgetUsage)> {
        self.rows.iter().filter(|(_, u)| u.is_over())
    }
}

/// Usage for every budget of `month`. Budgets of other months are ignored.
pub(crate) fn month_usage(
    month: &str,
    budgets: &[Budget],
    transactions: &[Transaction],
) -> Result<MonthUsage, InvalidBudgetError> {
    let mut rows = Vec::new();
    let mut total_limit = Decimal::ZERO;
    let mut total_used = Decimal::ZERO;

    let overflow = || InvalidBudgetError::UsageOverflow(month.to_string());

    for budget in budgets.iter().filter(|b| b.month == month) {
        let usage = compute_usage(budget, transactions)?;
        total_limit = total_limit.checked_add(budget.limit_amount).ok_or_else(overflow)?;
        total_used = total_used.checked_add(usage.used_amount).ok_or_else(overflow)?;
        rows.push((budget.clone(), usage));
    }

    Ok(MonthUsage {
        month: month.to_string(),
        rows,
        total_limit,
        total_used,
    })
}
