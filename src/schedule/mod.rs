use anyhow::{bail, Context, Result};
use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{Frequency, Recurrence, Transaction};
use crate::money::MIN_AMOUNT;
use crate::validate::parse_iso_date;

// ── Installments ──────────────────────────────────────────────

/// Split a purchase into `total` monthly installments.
///
/// Each installment gets the amount divided down to the cent; the leftover
/// cents go to the first one so the parts add up to the original amount.
/// Fails when the amount can't give every installment at least one cent.
/// The k-th installment is dated k calendar months after the original date,
/// clamped to the end of shorter months (Jan 31 -> Feb 28 -> Mar 31).
pub(crate) fn split_installments(txn: &Transaction, total: u32) -> Result<Vec<Transaction>> {
    if total <= 1 {
        return Ok(vec![txn.clone()]);
    }
    let start = parse_iso_date(&txn.date)
        .with_context(|| format!("Invalid transaction date: {}", txn.date))?;

    let count = Decimal::from(total);
    let cents = txn
        .amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .with_context(|| format!("Amount {} is out of range", txn.amount))?;
    let share = (cents / count).floor() / Decimal::ONE_HUNDRED;
    if share < MIN_AMOUNT {
        bail!(
            "Amount {} is too small to split into {total} installments",
            txn.amount
        );
    }
    let remainder = txn.amount - share * count;

    let mut parts = Vec::with_capacity(total as usize);
    for k in 0..total {
        let date = start
            .checked_add_months(Months::new(k))
            .with_context(|| format!("Installment {} date out of range", k + 1))?;

        let mut part = txn.clone();
        part.id = None;
        part.amount = if k == 0 { share + remainder } else { share };
        part.date = date.format("%Y-%m-%d").to_string();
        part.description = format!("{} ({}/{})", txn.description, k + 1, total);
        part.installment_n = Some(k + 1);
        part.installments_total = Some(total);
        parts.push(part);
    }
    Ok(parts)
}

// ── Recurrences ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DueRun {
    pub(crate) occurrences: Vec<Transaction>,
    /// First occurrence not yet materialized.
    pub(crate) next_run_at: String,
    /// The next occurrence falls after `end_at`; nothing will ever be due again.
    pub(crate) finished: bool,
}

/// The `n`-th occurrence counted from `start`. Monthly and yearly steps are
/// anchored on `start` so a 31st keeps coming back after short months.
fn nth_occurrence(start: NaiveDate, freq: Frequency, n: u32) -> Option<NaiveDate> {
    match freq {
        Frequency::Weekly => start.checked_add_days(Days::new(7 * u64::from(n))),
        Frequency::Monthly => start.checked_add_months(Months::new(n)),
        Frequency::Yearly => start.checked_add_months(Months::new(n.checked_mul(12)?)),
    }
}

/// Materialize every occurrence of `recurrence` dated on or before `today`
/// and not past its end date.
pub(crate) fn due_occurrences(recurrence: &Recurrence, today: NaiveDate) -> Result<DueRun> {
    let start = parse_iso_date(&recurrence.next_run_at)
        .with_context(|| format!("Invalid next run date: {}", recurrence.next_run_at))?;
    let end = match &recurrence.end_at {
        Some(end) => {
            Some(parse_iso_date(end).with_context(|| format!("Invalid end date: {end}"))?)
        }
        None => None,
    };
    let past_end = |d: NaiveDate| end.is_some_and(|e| d > e);

    let mut occurrences = Vec::new();
    let mut n = 0u32;
    let mut next = start;
    while next <= today && !past_end(next) {
        let mut txn = recurrence.template.clone();
        txn.id = None;
        txn.date = next.format("%Y-%m-%d").to_string();
        txn.created_at = chrono::Utc::now().to_rfc3339();
        occurrences.push(txn);

        n += 1;
        next = match nth_occurrence(start, recurrence.freq, n) {
            Some(d) => d,
            None => bail!("Recurrence date out of range after {}", recurrence.next_run_at),
        };
    }

    Ok(DueRun {
        occurrences,
        next_run_at: next.format("%Y-%m-%d").to_string(),
        finished: past_end(next),
    })
}
