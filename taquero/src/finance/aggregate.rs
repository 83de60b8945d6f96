//! Ledger entries and date-bucket aggregation
//!
//! Everything is summed in `Decimal`, so the day buckets inside a week,
//! month or quarter add up exactly to that bucket's totals.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult, ErrorCode};

use super::parsers::FinanceRows;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Day,
    Week,
    Month,
    Quarter,
}

impl std::str::FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Period::Day),
            "week" | "weekly" => Ok(Period::Week),
            "month" | "monthly" => Ok(Period::Month),
            "quarter" | "quarterly" => Ok(Period::Quarter),
            other => Err(AppError::invalid(format!("Unknown period: {other}"))),
        }
    }
}

/// First day of the bucket containing `date` (weeks start on Monday)
pub fn bucket_start(period: Period, date: NaiveDate) -> NaiveDate {
    match period {
        Period::Day => date,
        Period::Week => date - Days::new(u64::from(date.weekday().num_days_from_monday())),
        Period::Month => date.with_day(1).unwrap_or(date),
        Period::Quarter => {
            let month = (date.month0() / 3) * 3 + 1;
            NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
        }
    }
}

/// Last day of the bucket starting at `start`
pub fn bucket_end(period: Period, start: NaiveDate) -> NaiveDate {
    let next = match period {
        Period::Day => start.checked_add_days(Days::new(1)),
        Period::Week => start.checked_add_days(Days::new(7)),
        Period::Month => start.checked_add_months(Months::new(1)),
        Period::Quarter => start.checked_add_months(Months::new(3)),
    };
    next.and_then(|n| n.pred_opt()).unwrap_or(start)
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> AppResult<Self> {
        if from > to {
            return Err(AppError::with_message(
                ErrorCode::InvalidDateRange,
                format!("Start date {from} is after end date {to}"),
            ));
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Net takings from the till
    Income,
    /// Money paid out of the bank account
    Expense,
    /// Money paid into the bank account
    CashIn,
}

/// One dated amount (always positive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub amount: Decimal,
}

/// Flatten imported rows into dated entries; item sales carry no date and are left out
pub fn ledger(rows: &FinanceRows) -> Vec<LedgerEntry> {
    let mut entries = Vec::with_capacity(rows.daily_sales.len() + rows.bank_lines.len());
    for sale in &rows.daily_sales {
        entries.push(LedgerEntry {
            date: sale.date,
            kind: EntryKind::Income,
            amount: sale.net,
        });
    }
    for line in &rows.bank_lines {
        if line.amount.is_zero() {
            continue;
        }
        let kind = if line.amount.is_sign_negative() {
            EntryKind::Expense
        } else {
            EntryKind::CashIn
        };
        entries.push(LedgerEntry {
            date: line.date,
            kind,
            amount: line.amount.abs(),
        });
    }
    entries.sort_by_key(|e| e.date);
    entries
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub cash_in: Decimal,
}

impl Totals {
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }

    fn add(&mut self, entry: &LedgerEntry) {
        match entry.kind {
            EntryKind::Income => self.income += entry.amount,
            EntryKind::Expense => self.expense += entry.amount,
            EntryKind::CashIn => self.cash_in += entry.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub cash_in: Decimal,
    pub net: Decimal,
}

/// Sum entries in `range` (everything when `None`)
pub fn totals(entries: &[LedgerEntry], range: Option<DateRange>) -> Totals {
    let mut totals = Totals::default();
    for entry in entries.iter().filter(|e| range.is_none_or(|r| r.contains(e.date))) {
        totals.add(entry);
    }
    totals
}

/// Bucket entries by period, oldest first; empty buckets are left out
pub fn aggregate(entries: &[LedgerEntry], period: Period, range: Option<DateRange>) -> Vec<PeriodTotals> {
    let mut buckets: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
    for entry in entries.iter().filter(|e| range.is_none_or(|r| r.contains(e.date))) {
        buckets.entry(bucket_start(period, entry.date)).or_default().add(entry);
    }
    buckets
        .into_iter()
        .map(|(start, t)| PeriodTotals {
            start,
            end: bucket_end(period, start),
            net: t.net(),
            income: t.income,
            expense: t.expense,
            cash_in: t.cash_in,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::parsers::{BankLine, DailySale};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_starts_monday() {
        // 2024-03-03 is a Sunday, 2024-03-04 a Monday
        assert_eq!(bucket_start(Period::Week, d(2024, 3, 3)), d(2024, 2, 26));
        assert_eq!(bucket_start(Period::Week, d(2024, 3, 4)), d(2024, 3, 4));
        assert_eq!(bucket_start(Period::Week, d(2024, 3, 10)), d(2024, 3, 4));
        assert_eq!(bucket_end(Period::Week, d(2024, 3, 4)), d(2024, 3, 10));
    }

    #[test]
    fn test_month_and_quarter_bounds() {
        assert_eq!(bucket_start(Period::Month, d(2024, 2, 29)), d(2024, 2, 1));
        assert_eq!(bucket_end(Period::Month, d(2024, 2, 1)), d(2024, 2, 29));
        assert_eq!(bucket_start(Period::Quarter, d(2024, 8, 15)), d(2024, 7, 1));
        assert_eq!(bucket_end(Period::Quarter, d(2024, 10, 1)), d(2024, 12, 31));
        assert_eq!(bucket_start(Period::Day, d(2024, 1, 1)), d(2024, 1, 1));
    }

    #[test]
    fn test_ledger_splits_bank_lines() {
        let rows = FinanceRows {
            daily_sales: vec![DailySale {
                date: d(2024, 1, 2),
                orders: 5,
                gross: dec!(110),
                discounts: dec!(10),
                net: dec!(100),
            }],
            item_sales: vec![],
            bank_lines: vec![
                BankLine { date: d(2024, 1, 1), description: "Rent".into(), amount: dec!(-500) },
                BankLine { date: d(2024, 1, 3), description: "Payout".into(), amount: dec!(90) },
                BankLine { date: d(2024, 1, 3), description: "Fee reversal".into(), amount: dec!(0) },
            ],
        };
        let entries = ledger(&rows);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, EntryKind::Expense);
        assert_eq!(entries[0].amount, dec!(500));
        let t = totals(&entries, None);
        assert_eq!(t.net(), dec!(-400));
        assert_eq!(t.cash_in, dec!(90));
    }

    #[test]
    fn test_range_validation() {
        assert!(DateRange::new(d(2024, 1, 1), d(2024, 1, 1)).is_ok());
        let err = DateRange::new(d(2024, 2, 1), d(2024, 1, 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDateRange);
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("Weekly".parse::<Period>().unwrap(), Period::Week);
        assert!("fortnight".parse::<Period>().is_err());
    }
}
