//! Approved supplier: Supplier → Contact → Products → Approval

use chrono::NaiveDate;
use shared::AppResult;
use shared::models::{RecordMeta, SupplierRecord};

use super::{FieldIssue, WizardForm, limit_text, require_text, unknown_step};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, non_blank, normalize_list};

/// Highest food hygiene rating
pub const MAX_HYGIENE_RATING: u8 = 5;

#[derive(Debug, Clone, Default)]
pub struct SupplierForm {
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub products: Vec<String>,
    pub approved: bool,
    pub hygiene_rating: Option<u8>,
    pub last_reviewed: Option<NaiveDate>,
}

impl WizardForm for SupplierForm {
    type Output = SupplierRecord;
    const STEPS: &'static [&'static str] = &["Supplier", "Contact", "Products", "Approval"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => require_text(&mut issues, "name", "Supplier name", &self.name, MAX_NAME_LEN),
            1 => {
                if non_blank(&self.phone).is_none() && non_blank(&self.email).is_none() {
                    issues.push(FieldIssue::new("phone", "Enter a phone number or an email"));
                }
                if let Some(email) = non_blank(&self.email)
                    && !email.contains('@')
                {
                    issues.push(FieldIssue::new("email", "Email address is not valid"));
                }
                limit_text(&mut issues, "contactName", "Contact name", &self.contact_name, MAX_NAME_LEN);
                limit_text(&mut issues, "phone", "Phone", &self.phone, MAX_SHORT_TEXT_LEN);
            }
            2 => {
                if normalize_list(&self.products).is_empty() {
                    issues.push(FieldIssue::new("products", "List at least one product"));
                }
            }
            3 => {
                if self.hygiene_rating.is_some_and(|r| r > MAX_HYGIENE_RATING) {
                    issues.push(FieldIssue::new("hygieneRating", "Hygiene rating runs from 0 to 5"));
                }
                if self.approved && self.hygiene_rating.is_none() {
                    issues.push(FieldIssue::new("hygieneRating", "Record the hygiene rating before approving"));
                }
            }
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, author: &str) -> AppResult<SupplierRecord> {
        Ok(SupplierRecord {
            meta: RecordMeta::new(author),
            name: self.name.trim().to_string(),
            contact_name: non_blank(&self.contact_name),
            phone: non_blank(&self.phone),
            email: non_blank(&self.email),
            products: normalize_list(&self.products),
            approved: self.approved,
            hygiene_rating: self.hygiene_rating,
            last_reviewed: self.last_reviewed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizards::Wizard;

    fn form() -> SupplierForm {
        SupplierForm {
            name: "Green Farm".into(),
            email: Some("orders@greenfarm.test".into()),
            products: vec!["limes".into(), "coriander".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_contact_requires_phone_or_email() {
        let mut f = form();
        f.email = None;
        assert_eq!(f.check_step(1)[0].field, "phone");
        f.phone = Some("01234 567890".into());
        assert!(f.check_step(1).is_empty());
    }

    #[test]
    fn test_approval_needs_rating() {
        let mut f = form();
        f.approved = true;
        assert_eq!(f.check_step(3).len(), 1);
        f.hygiene_rating = Some(6);
        assert_eq!(f.check_step(3)[0].message, "Hygiene rating runs from 0 to 5");
        f.hygiene_rating = Some(5);
        let supplier = Wizard::new(f).submit("pat").unwrap();
        assert!(supplier.approved);
        assert_eq!(supplier.products, vec!["limes", "coriander"]);
    }
}
