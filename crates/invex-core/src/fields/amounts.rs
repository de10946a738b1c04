//! Amount parsing and validation for invoice totals.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Strip currency signs and thousands separators from a captured amount
/// (e.g., "₹1,234.56" becomes "1234.56").
pub fn normalize_amount(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Parse a captured amount into a decimal, if well-formed.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let normalized = normalize_amount(raw);
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}

/// Accept a captured amount only when it parses to a strictly positive
/// value; "Grand Total: 0.00" template lines fail here.
pub fn validate_amount(candidate: &str) -> bool {
    parse_amount(candidate).is_some_and(|amount| amount > Decimal::ZERO)
}
