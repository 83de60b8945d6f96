//! B2B Sale Model (wholesale invoices to other businesses)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RecordMeta;
use crate::impl_record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl SaleLine {
    pub fn total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B2bSale {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub customer: String,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub lines: Vec<SaleLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub paid: bool,
}

impl B2bSale {
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(SaleLine::total).sum()
    }

    /// Unpaid and past its due date on `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.paid && self.due_date.is_some_and(|due| due < today)
    }
}

impl_record!(B2bSale, "b2b_sales", Soft);
