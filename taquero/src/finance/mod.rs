//! Finance: POS and bank CSV import, period totals and the health score
//!
//! ```text
//! bytes ─► decode ─► parse_csv ─► FinanceRows ─► FinanceBook (key "finance")
//!                     │                              │
//!                  detect                    ledger ─► aggregate / health_score
//! ```

pub mod aggregate;
pub mod book;
pub mod detect;
pub mod health;
pub mod import;
pub mod money;
pub mod parsers;

pub use aggregate::{DateRange, EntryKind, LedgerEntry, Period, PeriodTotals, Totals, aggregate, bucket_start, ledger};
pub use book::{Dashboard, FinanceBook, MergeStats};
pub use detect::{CsvKind, detect};
pub use health::{HealthBand, HealthScore, health_score};
pub use import::{FileOutcome, ImportReport, import_bytes, import_files};
pub use money::parse_money;
pub use parsers::{BankLine, DailySale, FinanceRows, ItemSale, ParsedFile, SkippedRow, parse_csv};
