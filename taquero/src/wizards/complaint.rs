//! Customer complaint: Customer → Complaint → Resolution → Review

use chrono::NaiveDate;
use shared::{AppError, AppResult};
use shared::models::{Complaint, ComplaintCategory, ComplaintChannel, RecordMeta};

use super::{FieldIssue, WizardForm, limit_text, require, require_text, unknown_step};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, non_blank};

#[derive(Debug, Clone, Default)]
pub struct ComplaintForm {
    pub customer_name: String,
    pub customer_contact: Option<String>,
    pub received_on: Option<NaiveDate>,
    pub channel: ComplaintChannel,
    pub category: Option<ComplaintCategory>,
    pub details: String,
    pub resolution: Option<String>,
    pub resolved: bool,
}

impl WizardForm for ComplaintForm {
    type Output = Complaint;
    const STEPS: &'static [&'static str] = &["Customer", "Complaint", "Resolution", "Review"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => {
                require_text(&mut issues, "customerName", "Customer name", &self.customer_name, MAX_NAME_LEN);
                require(&mut issues, "receivedOn", "Date received", &self.received_on);
                limit_text(&mut issues, "customerContact", "Contact", &self.customer_contact, MAX_SHORT_TEXT_LEN);
            }
            1 => {
                require(&mut issues, "category", "Category", &self.category);
                require_text(&mut issues, "details", "Details", &self.details, MAX_NOTE_LEN);
                if self.category.is_some_and(|c| c.is_food_safety()) && non_blank(&self.customer_contact).is_none() {
                    issues.push(FieldIssue::new(
                        "customerContact",
                        "Food safety complaints need a contact for follow-up",
                    ));
                }
            }
            2 => {
                if self.resolved && non_blank(&self.resolution).is_none() {
                    issues.push(FieldIssue::new("resolution", "Describe how the complaint was resolved"));
                }
                limit_text(&mut issues, "resolution", "Resolution", &self.resolution, MAX_NOTE_LEN);
            }
            3 => {}
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, author: &str) -> AppResult<Complaint> {
        let (Some(received_on), Some(category)) = (self.received_on, self.category) else {
            return Err(AppError::required("complaint details"));
        };
        Ok(Complaint {
            meta: RecordMeta::new(author),
            received_on,
            customer_name: self.customer_name.trim().to_string(),
            customer_contact: non_blank(&self.customer_contact),
            channel: self.channel,
            category,
            details: self.details.trim().to_string(),
            resolution: non_blank(&self.resolution),
            resolved: self.resolved,
        })
    }
}
