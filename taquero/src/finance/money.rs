//! Tolerant money parsing for export cells

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+(?:\.\d+)?|\.\d+)$").expect("amount pattern is valid"));

const CURRENCY_MARKS: &[&str] = &["£", "$", "€", "GBP", "EUR", "USD"];

/// Parse an amount such as `£1,234.50`, `-12.00`, `(45.10)` or `12.00-`
///
/// Returns `None` for blank or unparsable cells.
pub fn parse_money(cell: &str) -> Option<Decimal> {
    let mut s = cell.trim().trim_matches('"').trim().to_string();
    if s.is_empty() {
        return None;
    }

    let mut negative = false;
    if s.starts_with('(') && s.ends_with(')') {
        negative = true;
        s = s[1..s.len() - 1].to_string();
    }
    for mark in CURRENCY_MARKS {
        s = s.replace(mark, "");
    }
    s.retain(|c| c != ',' && !c.is_whitespace());
    if let Some(rest) = s.strip_prefix('-') {
        negative = !negative;
        s = rest.to_string();
    } else if let Some(rest) = s.strip_suffix('-') {
        negative = !negative;
        s = rest.to_string();
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest.to_string();
    }

    if !AMOUNT.is_match(&s) {
        return None;
    }
    let value = Decimal::from_str(&s).ok()?;
    Some(if negative { -value } else { value })
}

/// Like [`parse_money`] but a blank cell counts as zero
pub fn parse_money_or_zero(cell: &str) -> Option<Decimal> {
    if cell.trim().trim_matches('"').trim().is_empty() {
        Some(Decimal::ZERO)
    } else {
        parse_money(cell)
    }
}

/// Whole, non-negative count (orders, covers)
pub fn parse_count(cell: &str) -> Option<u32> {
    let value = parse_money(cell)?;
    if value.is_sign_negative() || !value.fract().is_zero() {
        return None;
    }
    value.to_u32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plain_and_symbols() {
        assert_eq!(parse_money("12"), Some(dec!(12)));
        assert_eq!(parse_money(" 12.50 "), Some(dec!(12.50)));
        assert_eq!(parse_money("£1,234.56"), Some(dec!(1234.56)));
        assert_eq!(parse_money("\"$ 99.99\""), Some(dec!(99.99)));
        assert_eq!(parse_money("€.5"), Some(dec!(0.5)));
        assert_eq!(parse_money("GBP 10"), Some(dec!(10)));
    }

    #[test]
    fn test_negatives() {
        assert_eq!(parse_money("-12.00"), Some(dec!(-12.00)));
        assert_eq!(parse_money("-£3.20"), Some(dec!(-3.20)));
        assert_eq!(parse_money("£-3.20"), Some(dec!(-3.20)));
        assert_eq!(parse_money("(45.10)"), Some(dec!(-45.10)));
        assert_eq!(parse_money("7.00-"), Some(dec!(-7.00)));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_money(""), None);
        assert_eq!(parse_money("   "), None);
        assert_eq!(parse_money("n/a"), None);
        assert_eq!(parse_money("12.3.4"), None);
        assert_eq!(parse_money("1e5"), None);
        assert_eq!(parse_money("--5"), None);
    }

    #[test]
    fn test_blank_as_zero() {
        assert_eq!(parse_money_or_zero(""), Some(Decimal::ZERO));
        assert_eq!(parse_money_or_zero("2.5"), Some(dec!(2.5)));
        assert_eq!(parse_money_or_zero("abc"), None);
    }

    #[test]
    fn test_counts() {
        assert_eq!(parse_count("42"), Some(42));
        assert_eq!(parse_count("1,204"), Some(1204));
        assert_eq!(parse_count("3.0"), Some(3));
        assert_eq!(parse_count("2.5"), None);
        assert_eq!(parse_count("-1"), None);
    }
}
