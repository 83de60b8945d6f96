//! Incident report: What happened → Where & when → Action → Review

use chrono::NaiveDateTime;
use shared::{AppError, AppResult};
use shared::models::{Incident, IncidentCategory, RecordMeta, Severity};

use super::{FieldIssue, WizardForm, limit_text, require, require_text, unknown_step};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, non_blank};

#[derive(Debug, Clone, Default)]
pub struct IncidentForm {
    pub category: Option<IncidentCategory>,
    pub severity: Option<Severity>,
    pub description: String,
    pub occurred_at: Option<NaiveDateTime>,
    pub location: String,
    pub action_taken: String,
    pub reported_to: Option<String>,
}

impl WizardForm for IncidentForm {
    type Output = Incident;
    const STEPS: &'static [&'static str] = &["What happened", "Where & when", "Action", "Review"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => {
                require(&mut issues, "category", "Category", &self.category);
                require(&mut issues, "severity", "Severity", &self.severity);
                require_text(&mut issues, "description", "Description", &self.description, MAX_NOTE_LEN);
            }
            1 => {
                require(&mut issues, "occurredAt", "Date and time", &self.occurred_at);
                require_text(&mut issues, "location", "Location", &self.location, MAX_NAME_LEN);
            }
            2 => {
                require_text(&mut issues, "actionTaken", "Action taken", &self.action_taken, MAX_NOTE_LEN);
                if self.severity == Some(Severity::High) && non_blank(&self.reported_to).is_none() {
                    issues.push(FieldIssue::new(
                        "reportedTo",
                        "High severity incidents must say who they were reported to",
                    ));
                }
                limit_text(&mut issues, "reportedTo", "Reported to", &self.reported_to, MAX_SHORT_TEXT_LEN);
            }
            3 => {}
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, author: &str) -> AppResult<Incident> {
        let (Some(category), Some(severity), Some(occurred_at)) = (self.category, self.severity, self.occurred_at)
        else {
            return Err(AppError::required("incident details"));
        };
        Ok(Incident {
            meta: RecordMeta::new(author),
            occurred_at,
            location: self.location.trim().to_string(),
            category,
            severity,
            description: self.description.trim().to_string(),
            action_taken: self.action_taken.trim().to_string(),
            reported_to: non_blank(&self.reported_to),
        })
    }
}
