//! Export type detection from the header row
//!
//! Matching is by lower-cased substring, so column order and extra columns
//! do not matter.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvKind {
    /// POS end-of-day summary: one row per trading day
    DailySales,
    /// POS item summary: one row per menu item
    ItemSales,
    /// Bank statement: one row per transaction
    BankStatement,
}

impl CsvKind {
    pub fn label(&self) -> &'static str {
        match self {
            CsvKind::DailySales => "daily sales",
            CsvKind::ItemSales => "item sales",
            CsvKind::BankStatement => "bank statement",
        }
    }
}

impl std::fmt::Display for CsvKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn normalize_header(h: &str) -> String {
    h.trim().trim_start_matches('\u{feff}').trim_matches('"').trim().to_lowercase()
}

fn words(h: &str) -> impl Iterator<Item = &str> {
    h.split(|c: char| !c.is_ascii_alphanumeric()).filter(|w| !w.is_empty())
}

pub(crate) fn is_date(h: &str) -> bool {
    h.contains("date")
}

pub(crate) fn is_description(h: &str) -> bool {
    h.contains("description") || h.contains("details") || h.contains("narrative")
}

pub(crate) fn is_amount(h: &str) -> bool {
    h.contains("amount")
}

/// `Paid in`, `Money in`, `Credit`
pub(crate) fn is_paid_in(h: &str) -> bool {
    words(h).any(|w| w == "in") || h.contains("credit")
}

/// `Paid out`, `Money out`, `Debit`
pub(crate) fn is_paid_out(h: &str) -> bool {
    words(h).any(|w| w == "out") || h.contains("debit")
}

pub(crate) fn position(headers: &[String], pred: impl Fn(&str) -> bool) -> Option<usize> {
    headers.iter().position(|h| pred(h))
}

fn has(headers: &[String], needle: &str) -> bool {
    headers.iter().any(|h| h.contains(needle))
}

/// Classify a header row
///
/// Daily sales wins over item sales, which wins over a bank statement, when a
/// header row would match more than one.
pub fn detect<S: AsRef<str>>(headers: &[S]) -> Option<CsvKind> {
    let headers: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();

    if has(&headers, "date") && has(&headers, "orders") && has(&headers, "discount") {
        return Some(CsvKind::DailySales);
    }
    if has(&headers, "item") && has(&headers, "quantity") && has(&headers, "gross") {
        return Some(CsvKind::ItemSales);
    }
    let amounts = headers.iter().any(|h| is_amount(h))
        || (headers.iter().any(|h| is_paid_in(h)) && headers.iter().any(|h| is_paid_out(h)));
    if headers.iter().any(|h| is_date(h)) && headers.iter().any(|h| is_description(h)) && amounts {
        return Some(CsvKind::BankStatement);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_sales() {
        let h = ["Date", "Orders", "Gross Sales", "Discounts", "Net Sales"];
        assert_eq!(detect(&h), Some(CsvKind::DailySales));
    }

    #[test]
    fn test_item_sales() {
        let h = ["Category", "Item", "Quantity Sold", "Gross Sales"];
        assert_eq!(detect(&h), Some(CsvKind::ItemSales));
    }

    #[test]
    fn test_bank_signed_and_split() {
        assert_eq!(
            detect(&["Transaction Date", "Description", "Amount", "Balance"]),
            Some(CsvKind::BankStatement)
        );
        assert_eq!(
            detect(&["Date", "Details", "Paid out", "Paid in", "Balance"]),
            Some(CsvKind::BankStatement)
        );
        assert_eq!(
            detect(&["Date", "Description", "Debit", "Credit"]),
            Some(CsvKind::BankStatement)
        );
    }

    #[test]
    fn test_in_needs_a_whole_word() {
        // "running balance" contains "in" but is not a paid-in column
        assert_eq!(detect(&["Date", "Description", "Running balance", "Paid out"]), None);
    }

    #[test]
    fn test_order_independent() {
        let headers = ["Date", "Orders", "Gross Sales", "Discounts", "Net Sales"];
        let mut reversed = headers;
        reversed.reverse();
        let mut rotated = headers;
        rotated.rotate_left(2);
        assert_eq!(detect(&headers), detect(&reversed));
        assert_eq!(detect(&headers), detect(&rotated));
    }

    #[test]
    fn test_unknown_and_bom() {
        assert_eq!(detect(&["Name", "Email"]), None);
        assert_eq!(detect::<&str>(&[]), None);
        assert_eq!(
            detect(&["\u{feff}Date", "\"Orders\"", "Discounts", "Net"]),
            Some(CsvKind::DailySales)
        );
    }
}
