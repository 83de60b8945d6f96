//! Business health score
//!
//! Three sub-scores, each read off a step table, weighted into a 0-10
//! overall score:
//!
//! | component                | weight |
//! |--------------------------|--------|
//! | profit margin (%)        | 0.40   |
//! | average monthly revenue  | 0.35   |
//! | cash-flow ratio in/out   | 0.25   |

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use super::aggregate::{EntryKind, LedgerEntry, Totals};

pub const MARGIN_WEIGHT: f64 = 0.40;
pub const REVENUE_WEIGHT: f64 = 0.35;
pub const CASH_FLOW_WEIGHT: f64 = 0.25;

/// (lower bound, score); the highest bound not above the value wins
type Breakpoints = &'static [(f64, f64)];

/// Net margin in percent
const MARGIN_TABLE: Breakpoints = &[(0.0, 2.0), (5.0, 4.0), (10.0, 6.0), (15.0, 8.0), (20.0, 10.0)];

/// Average monthly net takings in pounds
const REVENUE_TABLE: Breakpoints = &[
    (0.0, 0.0),
    (1_000.0, 2.0),
    (2_500.0, 4.0),
    (5_000.0, 6.0),
    (10_000.0, 8.0),
    (20_000.0, 10.0),
];

/// Cash in divided by cash out
const CASH_FLOW_TABLE: Breakpoints = &[(0.0, 0.0), (0.8, 2.0), (1.0, 5.0), (1.2, 7.0), (1.5, 9.0), (2.0, 10.0)];

fn score(table: Breakpoints, value: f64) -> f64 {
    table
        .iter()
        .take_while(|(bound, _)| value >= *bound)
        .last()
        .map_or(0.0, |(_, s)| *s)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    Poor,
    Fair,
    Good,
}

impl HealthBand {
    fn from_score(overall: f64) -> Self {
        if overall >= 7.0 {
            HealthBand::Good
        } else if overall >= 4.0 {
            HealthBand::Fair
        } else {
            HealthBand::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    /// `None` without any income
    pub margin_pct: Option<f64>,
    pub avg_monthly_revenue: Decimal,
    /// `None` when nothing was paid out
    pub cash_flow_ratio: Option<f64>,
    pub margin_score: f64,
    pub revenue_score: f64,
    pub cash_flow_score: f64,
    /// 0-10, one decimal place
    pub overall: f64,
    pub band: HealthBand,
}

/// Calendar months from the first to the last income entry, inclusive
fn months_spanned(entries: &[LedgerEntry]) -> u32 {
    let mut dates = entries.iter().filter(|e| e.kind == EntryKind::Income).map(|e| e.date);
    let Some(first) = dates.next() else {
        return 1;
    };
    let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    let index = |d: NaiveDate| d.year() * 12 + d.month0() as i32;
    (index(max) - index(min) + 1).max(1) as u32
}

/// Score the entries (already limited to the range being looked at)
pub fn health_score(entries: &[LedgerEntry], totals: &Totals) -> HealthScore {
    let margin_pct = (!totals.income.is_zero())
        .then(|| (totals.net() / totals.income * Decimal::ONE_HUNDRED).to_f64())
        .flatten();
    let avg_monthly_revenue = (totals.income / Decimal::from(months_spanned(entries))).round_dp(2);
    let cash_flow_ratio = (!totals.expense.is_zero())
        .then(|| (totals.cash_in / totals.expense).to_f64())
        .flatten();

    let margin_score = margin_pct.map_or(0.0, |m| score(MARGIN_TABLE, m));
    let revenue_score = score(REVENUE_TABLE, avg_monthly_revenue.to_f64().unwrap_or(0.0));
    let cash_flow_score = match cash_flow_ratio {
        Some(ratio) => score(CASH_FLOW_TABLE, ratio),
        // money came in and none went out
        None if totals.cash_in > Decimal::ZERO => 10.0,
        None => 0.0,
    };

    let weighted = margin_score * MARGIN_WEIGHT + revenue_score * REVENUE_WEIGHT + cash_flow_score * CASH_FLOW_WEIGHT;
    let overall = (weighted * 10.0).round() / 10.0;

    HealthScore {
        margin_pct,
        avg_monthly_revenue,
        cash_flow_ratio,
        margin_score,
        revenue_score,
        cash_flow_score,
        overall,
        band: HealthBand::from_score(overall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::aggregate::totals;
    use rust_decimal_macros::dec;

    fn entry(y: i32, m: u32, d: u32, kind: EntryKind, amount: Decimal) -> LedgerEntry {
        LedgerEntry {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            kind,
            amount,
        }
    }

    #[test]
    fn test_breakpoints_are_inclusive_lower_bounds() {
        assert_eq!(score(MARGIN_TABLE, -3.0), 0.0);
        assert_eq!(score(MARGIN_TABLE, 0.0), 2.0);
        assert_eq!(score(MARGIN_TABLE, 9.99), 4.0);
        assert_eq!(score(MARGIN_TABLE, 10.0), 6.0);
        assert_eq!(score(MARGIN_TABLE, 55.0), 10.0);
        assert_eq!(score(CASH_FLOW_TABLE, 1.0), 5.0);
    }

    #[test]
    fn test_healthy_business() {
        // two months, £12k income each, 80% of income paid out
        let entries = vec![
            entry(2024, 1, 10, EntryKind::Income, dec!(12000)),
            entry(2024, 2, 10, EntryKind::Income, dec!(12000)),
            entry(2024, 1, 31, EntryKind::Expense, dec!(19200)),
            entry(2024, 2, 28, EntryKind::CashIn, dec!(16000)),
        ];
        let t = totals(&entries, None);
        let h = health_score(&entries, &t);
        assert_eq!(h.margin_pct, Some(20.0));
        assert_eq!(h.avg_monthly_revenue, dec!(12000));
        assert_eq!(h.margin_score, 10.0);
        assert_eq!(h.revenue_score, 8.0);
        // 16000 / 19200 = 0.83
        assert_eq!(h.cash_flow_score, 2.0);
        // 4.0 + 2.8 + 0.5
        assert_eq!(h.overall, 7.3);
        assert_eq!(h.band, HealthBand::Good);
    }

    #[test]
    fn test_no_data_scores_zero() {
        let h = health_score(&[], &Totals::default());
        assert_eq!(h.margin_pct, None);
        assert_eq!(h.cash_flow_ratio, None);
        assert_eq!(h.overall, 0.0);
        assert_eq!(h.band, HealthBand::Poor);
    }

    #[test]
    fn test_months_spanned_counts_gaps() {
        let entries = vec![
            entry(2023, 11, 30, EntryKind::Income, dec!(100)),
            entry(2024, 2, 1, EntryKind::Income, dec!(300)),
        ];
        assert_eq!(months_spanned(&entries), 4);
        let h = health_score(&entries, &totals(&entries, None));
        assert_eq!(h.avg_monthly_revenue, dec!(100));
    }
}
