use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::LazyLock;

/// Smallest amount a transaction or budget limit can hold (one cent).
pub(crate) const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest amount accepted at the input boundary: 999.999.999.999,99.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

#[allow(clippy::expect_used)]
static NOT_AMOUNT_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9,.\-]").expect("amount regex"));

/// Parse a user-typed amount into a decimal.
///
/// Accepts Brazilian and plain notations: `"R$ 1.234,56"`, `"1234,56"`,
/// `"1234.56"` and `"1.234.567"`. With a comma present, dots are thousand
/// separators. Without one, a single dot followed by at most two digits is the
/// decimal point and any other dots are separators. More than two decimal
/// places or a second comma makes the input invalid.
pub(crate) fn parse_amount(input: &str) -> Option<Decimal> {
    let cleaned = NOT_AMOUNT_CHARS.replace_all(input.trim(), "");
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let negative = cleaned.starts_with('-');
    let body = cleaned.replace('-', "");

    let normalized = if let Some((int, frac)) = body.split_once(',') {
        if frac.len() > 2 || frac.contains([',', '.']) {
            return None;
        }
        format!("{}.{frac}", int.replace('.', ""))
    } else if body.matches('.').count() == 1
        && body.rsplit('.').next().is_some_and(|frac| frac.len() <= 2)
    {
        body
    } else {
        body.replace('.', "")
    };

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

/// Round to currency precision (2 decimal places, half away from zero).
pub(crate) fn round_cents(val: Decimal) -> Decimal {
    val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format with `.` thousand separators and `,` decimals.
/// e.g. `1234567.89` → `"R$ 1.234.567,89"`
pub(crate) fn format_amount(val: Decimal, symbol: &str) -> String {
    let abs = round_cents(val.abs());
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_dots: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(".");

    let sign = if round_cents(val) < Decimal::ZERO { "-" } else { "" };
    if symbol.is_empty() {
        format!("{sign}{with_dots},{dec_part}")
    } else {
        format!("{sign}{symbol} {with_dots},{dec_part}")
    }
}

/// Percentage with one decimal place, e.g. `80.6875` → `"80.7%"`.
pub(crate) fn format_percent(val: Decimal) -> String {
    let rounded = val.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}
