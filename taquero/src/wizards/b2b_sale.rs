//! Wholesale invoice: Customer → Lines → Terms → Review

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{AppError, AppResult};
use shared::models::{B2bSale, RecordMeta, SaleLine};

use super::{FieldIssue, WizardForm, require, require_text, unknown_step};
use crate::finance::money::parse_money;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN};

/// Invoice line as typed
#[derive(Debug, Clone, Default)]
pub struct SaleLineDraft {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
}

impl SaleLineDraft {
    pub fn new(description: &str, quantity: &str, unit_price: &str) -> Self {
        Self {
            description: description.to_string(),
            quantity: quantity.to_string(),
            unit_price: unit_price.to_string(),
        }
    }

    fn parse(&self) -> Option<SaleLine> {
        let quantity = Decimal::from_str(self.quantity.trim()).ok()?;
        let unit_price = parse_money(&self.unit_price)?;
        Some(SaleLine {
            description: self.description.trim().to_string(),
            quantity,
            unit_price,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct B2bSaleForm {
    pub customer: String,
    pub invoice_number: String,
    pub date: Option<NaiveDate>,
    pub lines: Vec<SaleLineDraft>,
    pub due_date: Option<NaiveDate>,
    pub paid: bool,
}

impl B2bSaleForm {
    /// Running total of the lines that parse
    pub fn total(&self) -> Decimal {
        self.lines.iter().filter_map(SaleLineDraft::parse).map(|l| l.total()).sum()
    }
}

impl WizardForm for B2bSaleForm {
    type Output = B2bSale;
    const STEPS: &'static [&'static str] = &["Customer", "Lines", "Terms", "Review"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => {
                require_text(&mut issues, "customer", "Customer", &self.customer, MAX_NAME_LEN);
                require_text(&mut issues, "invoiceNumber", "Invoice number", &self.invoice_number, MAX_SHORT_TEXT_LEN);
                require(&mut issues, "date", "Invoice date", &self.date);
            }
            1 => {
                if self.lines.is_empty() {
                    issues.push(FieldIssue::new("lines", "Add at least one line"));
                }
                for (i, draft) in self.lines.iter().enumerate() {
                    let n = i + 1;
                    if draft.description.trim().is_empty() {
                        issues.push(FieldIssue::new("lines", format!("Line {n}: description is required")));
                    }
                    match draft.parse() {
                        None => issues.push(FieldIssue::new("lines", format!("Line {n}: quantity or price is not a number"))),
                        Some(line) if line.quantity <= Decimal::ZERO => {
                            issues.push(FieldIssue::new("lines", format!("Line {n}: quantity must be above zero")))
                        }
                        Some(line) if line.unit_price < Decimal::ZERO => {
                            issues.push(FieldIssue::new("lines", format!("Line {n}: price cannot be negative")))
                        }
                        Some(_) => {}
                    }
                }
            }
            2 => {
                if let (Some(date), Some(due)) = (self.date, self.due_date)
                    && due < date
                {
                    issues.push(FieldIssue::new("dueDate", "Due date cannot be before the invoice date"));
                }
            }
            3 => {}
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, author: &str) -> AppResult<B2bSale> {
        let date = self.date.ok_or_else(|| AppError::required("date"))?;
        let lines = self
            .lines
            .iter()
            .map(|d| d.parse().ok_or_else(|| AppError::validation(format!("Invalid line: {}", d.description))))
            .collect::<AppResult<Vec<_>>>()?;
        Ok(B2bSale {
            meta: RecordMeta::new(author),
            customer: self.customer.trim().to_string(),
            invoice_number: self.invoice_number.trim().to_string(),
            date,
            lines,
            due_date: self.due_date,
            paid: self.paid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizards::Wizard;
    use rust_decimal_macros::dec;

    fn form() -> B2bSaleForm {
        B2bSaleForm {
            customer: "Hotel Azul".into(),
            invoice_number: "INV-0042".into(),
            date: NaiveDate::from_ymd_opt(2024, 4, 2),
            lines: vec![
                SaleLineDraft::new("Salsa roja 1L", "12", "£4.50"),
                SaleLineDraft::new("Tortillas (50)", "3", "7.20"),
            ],
            due_date: NaiveDate::from_ymd_opt(2024, 5, 2),
            paid: false,
        }
    }

    #[test]
    fn test_total_and_submit() {
        let f = form();
        assert_eq!(f.total(), dec!(75.60));
        let sale = Wizard::new(f).submit("ana").unwrap();
        assert_eq!(sale.total(), dec!(75.60));
        assert!(sale.is_overdue(NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()));
    }

    #[test]
    fn test_bad_lines_reported_by_number() {
        let mut f = form();
        f.lines.push(SaleLineDraft::new("Crema", "zero", "2"));
        f.lines.push(SaleLineDraft::new("", "0", "2"));
        let messages: Vec<_> = f.check_step(1).into_iter().map(|i| i.message).collect();
        assert_eq!(
            messages,
            vec![
                "Line 3: quantity or price is not a number",
                "Line 4: description is required",
                "Line 4: quantity must be above zero",
            ]
        );
    }

    #[test]
    fn test_due_date_after_invoice() {
        let mut f = form();
        f.due_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(f.check_step(2)[0].field, "dueDate");
    }
}
