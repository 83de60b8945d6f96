//! Persisted finance data and the dashboard built from it

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{AppError, AppResult};

use super::aggregate::{DateRange, LedgerEntry, Period, PeriodTotals, Totals, aggregate, ledger, totals};
use super::health::{HealthScore, health_score};
use super::parsers::FinanceRows;
use crate::storage::KeyValueStore;

/// Storage key of the finance blob
pub const FINANCE_KEY: &str = "finance";

/// Items listed on the dashboard
const TOP_ITEMS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub item: String,
    pub quantity: Decimal,
    pub gross: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub range: Option<DateRange>,
    pub period: Period,
    pub buckets: Vec<PeriodTotals>,
    pub totals: Totals,
    pub net: Decimal,
    pub health: HealthScore,
    pub top_items: Vec<ItemSummary>,
}

/// Counts of rows added by [`FinanceBook::merge`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub duplicates: usize,
}

pub struct FinanceBook {
    rows: RwLock<FinanceRows>,
    storage: Arc<dyn KeyValueStore>,
}

/// Append incoming rows, each stored row absorbing at most one identical
/// incoming copy. Two identical card payments on one day are two payments,
/// so an overlapping statement carrying three of them adds the third.
fn merge_new<T: Clone + Eq + Hash>(existing: &mut Vec<T>, incoming: Vec<T>, stats: &mut MergeStats) {
    let mut stored: HashMap<T, usize> = HashMap::new();
    for row in existing.iter() {
        *stored.entry(row.clone()).or_default() += 1;
    }
    for row in incoming {
        match stored.get_mut(&row) {
            Some(count) if *count > 0 => {
                *count -= 1;
                stats.duplicates += 1;
            }
            _ => {
                existing.push(row);
                stats.added += 1;
            }
        }
    }
}

impl FinanceBook {
    pub fn open(storage: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let rows = match storage.get(FINANCE_KEY)? {
            Some(blob) => serde_json::from_str(&blob).map_err(|e| {
                AppError::storage_corrupted(format!("Finance data is corrupted: {e}"))
            })?,
            None => FinanceRows::default(),
        };
        Ok(Self {
            rows: RwLock::new(rows),
            storage,
        })
    }

    pub fn rows(&self) -> FinanceRows {
        self.rows.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Add imported rows, skipping ones a previous import already stored
    pub fn merge(&self, incoming: FinanceRows) -> AppResult<MergeStats> {
        let mut stats = MergeStats::default();
        let mut rows = self.rows.write();
        let mut next = rows.clone();
        merge_new(&mut next.daily_sales, incoming.daily_sales, &mut stats);
        merge_new(&mut next.item_sales, incoming.item_sales, &mut stats);
        merge_new(&mut next.bank_lines, incoming.bank_lines, &mut stats);
        if stats.added > 0 {
            self.persist(&next)?;
            *rows = next;
        }
        tracing::info!(added = stats.added, duplicates = stats.duplicates, "Finance rows merged");
        Ok(stats)
    }

    pub fn clear(&self) -> AppResult<()> {
        let mut rows = self.rows.write();
        self.storage.remove(FINANCE_KEY)?;
        *rows = FinanceRows::default();
        Ok(())
    }

    pub fn ledger(&self) -> Vec<LedgerEntry> {
        ledger(&self.rows.read())
    }

    pub fn dashboard(&self, range: Option<DateRange>, period: Period) -> Dashboard {
        let entries: Vec<LedgerEntry> = self
            .ledger()
            .into_iter()
            .filter(|e| range.is_none_or(|r| r.contains(e.date)))
            .collect();
        let totals = totals(&entries, None);
        Dashboard {
            range,
            period,
            buckets: aggregate(&entries, period, None),
            net: totals.net(),
            health: health_score(&entries, &totals),
            totals,
            top_items: self.top_items(TOP_ITEMS),
        }
    }

    /// Best sellers by gross takings
    pub fn top_items(&self, limit: usize) -> Vec<ItemSummary> {
        let mut by_item: BTreeMap<String, ItemSummary> = BTreeMap::new();
        for sale in &self.rows.read().item_sales {
            let summary = by_item.entry(sale.item.to_lowercase()).or_insert_with(|| ItemSummary {
                item: sale.item.clone(),
                quantity: Decimal::ZERO,
                gross: Decimal::ZERO,
            });
            summary.quantity += sale.quantity;
            summary.gross += sale.gross;
        }
        let mut items: Vec<ItemSummary> = by_item.into_values().collect();
        items.sort_by(|a, b| b.gross.cmp(&a.gross).then_with(|| a.item.cmp(&b.item)));
        items.truncate(limit);
        items
    }

    fn persist(&self, rows: &FinanceRows) -> AppResult<()> {
        let blob = serde_json::to_string(rows)
            .map_err(|e| AppError::internal(format!("Failed to serialize finance data: {e}")))?;
        self.storage.set(FINANCE_KEY, &blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::parsers::{BankLine, ItemSale};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn bank(day: u32, amount: Decimal) -> BankLine {
        BankLine {
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            description: "Card".into(),
            amount,
        }
    }

    fn item(name: &str, quantity: Decimal, gross: Decimal) -> ItemSale {
        ItemSale {
            item: name.into(),
            category: None,
            quantity,
            gross,
        }
    }

    #[test]
    fn test_merge_dedupes_across_imports_only() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let book = FinanceBook::open(storage.clone()).unwrap();
        let first = FinanceRows {
            bank_lines: vec![bank(1, dec!(-4.50)), bank(1, dec!(-4.50))],
            ..Default::default()
        };
        assert_eq!(book.merge(first.clone()).unwrap(), MergeStats { added: 2, duplicates: 0 });
        assert_eq!(book.merge(first).unwrap(), MergeStats { added: 0, duplicates: 2 });

        let reopened = FinanceBook::open(storage).unwrap();
        assert_eq!(reopened.rows().bank_lines.len(), 2);
    }

    #[test]
    fn test_overlapping_statement_adds_extra_identical_payment() {
        let book = FinanceBook::open(Arc::new(MemoryStore::new())).unwrap();
        let two = FinanceRows {
            bank_lines: vec![bank(3, dec!(-4.50)); 2],
            ..Default::default()
        };
        book.merge(two).unwrap();

        let three = FinanceRows {
            bank_lines: vec![bank(3, dec!(-4.50)); 3],
            ..Default::default()
        };
        assert_eq!(book.merge(three).unwrap(), MergeStats { added: 1, duplicates: 2 });
        assert_eq!(book.rows().bank_lines.len(), 3);
        assert_eq!(book.dashboard(None, Period::Month).totals.expense, dec!(13.50));
    }

    #[test]
    fn test_corrupted_blob() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(FINANCE_KEY, "{not json").unwrap();
        let err = FinanceBook::open(storage).err().unwrap();
        assert_eq!(err.code, shared::ErrorCode::StorageCorrupted);
    }

    #[test]
    fn test_top_items_groups_case_insensitively() {
        let book = FinanceBook::open(Arc::new(MemoryStore::new())).unwrap();
        book.merge(FinanceRows {
            item_sales: vec![
                item("Taco", dec!(10), dec!(30)),
                item("Horchata", dec!(5), dec!(15)),
                item("taco", dec!(2), dec!(6)),
            ],
            ..Default::default()
        })
        .unwrap();
        let top = book.top_items(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].item, "Taco");
        assert_eq!(top[0].gross, dec!(36));
    }

    #[test]
    fn test_dashboard_range() {
        let book = FinanceBook::open(Arc::new(MemoryStore::new())).unwrap();
        book.merge(FinanceRows {
            bank_lines: vec![bank(1, dec!(-10)), bank(20, dec!(-30))],
            ..Default::default()
        })
        .unwrap();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        )
        .unwrap();
        let dash = book.dashboard(Some(range), Period::Month);
        assert_eq!(dash.totals.expense, dec!(30));
        assert_eq!(dash.buckets.len(), 1);
        book.clear().unwrap();
        assert!(book.is_empty());
    }
}
