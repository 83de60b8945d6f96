//! Date helpers

use chrono::{Local, NaiveDate};
use shared::{AppError, AppResult, ErrorCode};

/// Formats seen in POS and bank exports, tried in order.
///
/// Day-first formats come before month-first ones: every export we import
/// is from a UK account.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    // two-digit years first: %Y would read "24" as the year 24
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
];

/// Parse a strict `YYYY-MM-DD` date (CLI arguments, config)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::with_message(ErrorCode::InvalidDate, format!("Invalid date format: {date}"))
    })
}

/// Parse a date cell from an export
///
/// Timestamps such as `2024-03-01 18:22:10` or `2024-03-01T18:22:10Z` keep
/// only their date part.
pub fn parse_flexible_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim().trim_matches('"');
    if cell.is_empty() {
        return None;
    }
    let date_part = match cell.find(['T', ' ']) {
        // "01 Mar 2024" contains spaces but is a plain date
        Some(idx) if cell[..idx].contains(['-', '/']) => &cell[..idx],
        _ => cell,
    };
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Today in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
