//! Export parsers
//!
//! Rows are split with the `csv` crate and columns are found by header name.
//! A row that cannot be read is skipped and reported with its line number;
//! it never contributes a partial value to the totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult, ErrorCode};

use super::detect::{
    CsvKind, detect, is_amount, is_date, is_description, is_paid_in, is_paid_out, normalize_header, position,
};
use super::money::{parse_count, parse_money, parse_money_or_zero};
use crate::utils::time::parse_flexible_date;

/// Rows of account details some banks put above the header
const MAX_PREAMBLE_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySale {
    pub date: NaiveDate,
    pub orders: u32,
    pub gross: Decimal,
    pub discounts: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSale {
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub quantity: Decimal,
    pub gross: Decimal,
}

/// Bank transaction; positive amounts are paid in, negative paid out
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankLine {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRows {
    #[serde(default)]
    pub daily_sales: Vec<DailySale>,
    #[serde(default)]
    pub item_sales: Vec<ItemSale>,
    #[serde(default)]
    pub bank_lines: Vec<BankLine>,
}

impl FinanceRows {
    pub fn len(&self) -> usize {
        self.daily_sales.len() + self.item_sales.len() + self.bank_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn extend(&mut self, other: FinanceRows) {
        self.daily_sales.extend(other.daily_sales);
        self.item_sales.extend(other.item_sales);
        self.bank_lines.extend(other.bank_lines);
    }
}

/// A row left out of an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line in the file
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub kind: CsvKind,
    pub rows: FinanceRows,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Copy)]
enum BankAmount {
    Signed(usize),
    Split { paid_in: usize, paid_out: usize },
}

#[derive(Debug, Clone, Copy)]
enum Layout {
    DailySales {
        date: usize,
        orders: usize,
        discounts: usize,
        gross: Option<usize>,
        net: Option<usize>,
    },
    ItemSales {
        item: usize,
        category: Option<usize>,
        quantity: usize,
        gross: usize,
    },
    Bank {
        date: usize,
        description: usize,
        amount: BankAmount,
    },
}

fn missing(column: &str) -> AppError {
    AppError::with_message(ErrorCode::CsvUnreadable, format!("Missing column: {column}"))
}

impl Layout {
    fn new(kind: CsvKind, headers: &[String]) -> AppResult<Self> {
        let find = |pred: &dyn Fn(&str) -> bool, name: &str| position(headers, pred).ok_or_else(|| missing(name));
        match kind {
            CsvKind::DailySales => {
                let gross = position(headers, |h| h.contains("gross"));
                let net = position(headers, |h| h.split(|c: char| !c.is_ascii_alphanumeric()).any(|w| w == "net"));
                if gross.is_none() && net.is_none() {
                    return Err(missing("gross or net sales"));
                }
                Ok(Layout::DailySales {
                    date: find(&is_date, "date")?,
                    orders: find(&|h: &str| h.contains("orders"), "orders")?,
                    discounts: find(&|h: &str| h.contains("discount"), "discounts")?,
                    gross,
                    net,
                })
            }
            CsvKind::ItemSales => Ok(Layout::ItemSales {
                item: find(&|h: &str| h.contains("item"), "item")?,
                category: position(headers, |h| h.contains("category")),
                quantity: find(&|h: &str| h.contains("quantity"), "quantity")?,
                gross: find(&|h: &str| h.contains("gross"), "gross")?,
            }),
            CsvKind::BankStatement => {
                let amount = match position(headers, is_amount) {
                    Some(col) => BankAmount::Signed(col),
                    None => BankAmount::Split {
                        paid_in: find(&is_paid_in, "paid in")?,
                        paid_out: find(&is_paid_out, "paid out")?,
                    },
                };
                Ok(Layout::Bank {
                    date: find(&is_date, "date")?,
                    description: find(&is_description, "description")?,
                    amount,
                })
            }
        }
    }

    fn parse_row(&self, record: &csv::StringRecord, rows: &mut FinanceRows) -> Result<(), String> {
        let cell = |i: usize| record.get(i).unwrap_or("");
        let date = |i: usize| parse_flexible_date(cell(i)).ok_or_else(|| format!("invalid date '{}'", cell(i)));
        let money = |i: usize, name: &str| parse_money(cell(i)).ok_or_else(|| format!("invalid {name} '{}'", cell(i)));
        let money_or_zero =
            |i: usize, name: &str| parse_money_or_zero(cell(i)).ok_or_else(|| format!("invalid {name} '{}'", cell(i)));

        match *self {
            Layout::DailySales {
                date: d,
                orders,
                discounts,
                gross,
                net,
            } => {
                let date = date(d)?;
                let orders = parse_count(cell(orders)).ok_or_else(|| format!("invalid orders '{}'", cell(orders)))?;
                let discounts = money_or_zero(discounts, "discounts")?.abs();
                let gross = gross.map(|g| money(g, "gross sales")).transpose()?;
                let net = net.map(|n| money(n, "net sales")).transpose()?;
                let (gross, net) = match (gross, net) {
                    (Some(g), Some(n)) => (g, n),
                    (Some(g), None) => (g, g - discounts),
                    (None, Some(n)) => (n + discounts, n),
                    (None, None) => return Err("no sales value".to_string()),
                };
                rows.daily_sales.push(DailySale {
                    date,
                    orders,
                    gross,
                    discounts,
                    net,
                });
            }
            Layout::ItemSales {
                item,
                category,
                quantity,
                gross,
            } => {
                let name = cell(item).trim();
                if name.is_empty() {
                    return Err("missing item name".to_string());
                }
                rows.item_sales.push(ItemSale {
                    item: name.to_string(),
                    category: category.map(|c| cell(c).trim()).filter(|c| !c.is_empty()).map(str::to_string),
                    quantity: money(quantity, "quantity")?,
                    gross: money(gross, "gross sales")?,
                });
            }
            Layout::Bank {
                date: d,
                description,
                amount,
            } => {
                let date = date(d)?;
                let amount = match amount {
                    BankAmount::Signed(col) => money(col, "amount")?,
                    BankAmount::Split { paid_in, paid_out } => {
                        money_or_zero(paid_in, "paid in")?.abs() - money_or_zero(paid_out, "paid out")?.abs()
                    }
                };
                rows.bank_lines.push(BankLine {
                    date,
                    description: cell(description).trim().to_string(),
                    amount,
                });
            }
        }
        Ok(())
    }
}

/// Detect and parse one export
pub fn parse_csv(text: &str) -> AppResult<ParsedFile> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut layout: Option<(CsvKind, Layout)> = None;
    let mut rows = FinanceRows::default();
    let mut skipped = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(index as u64 + 1, |p| p.line());
                if layout.is_none() {
                    return Err(AppError::with_message(
                        ErrorCode::CsvUnreadable,
                        format!("Unreadable CSV at line {line}: {e}"),
                    ));
                }
                skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map_or(index as u64 + 1, |p| p.line());

        if let Some((_, layout)) = &layout {
            if record.iter().all(str::is_empty) {
                continue;
            }
            if let Err(reason) = layout.parse_row(&record, &mut rows) {
                skipped.push(SkippedRow { line, reason });
            }
            continue;
        }

        if index >= MAX_PREAMBLE_ROWS {
            break;
        }
        let headers: Vec<String> = record.iter().map(normalize_header).collect();
        if let Some(kind) = detect(&headers) {
            layout = Some((kind, Layout::new(kind, &headers)?));
        }
    }

    let Some((kind, _)) = layout else {
        return Err(AppError::with_message(
            ErrorCode::CsvTypeNotDetected,
            "Could not recognise the export from its header row",
        ));
    };
    Ok(ParsedFile { kind, rows, skipped })
}
