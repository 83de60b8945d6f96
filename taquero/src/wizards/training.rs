//! Staff member and training record wizards

use chrono::NaiveDate;
use shared::{AppError, AppResult};
use shared::models::{RecordMeta, Staff, TrainingRecord};
use shared::util::record_id;

use super::{FieldIssue, WizardForm, limit_text, require, require_text, unknown_step};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, non_blank};

/// New staff member: Person → Role
#[derive(Debug, Clone, Default)]
pub struct StaffForm {
    pub name: String,
    pub role: String,
    pub start_date: Option<NaiveDate>,
}

impl WizardForm for StaffForm {
    type Output = Staff;
    const STEPS: &'static [&'static str] = &["Person", "Role"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => require_text(&mut issues, "name", "Name", &self.name, MAX_NAME_LEN),
            1 => require_text(&mut issues, "role", "Role", &self.role, MAX_SHORT_TEXT_LEN),
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, author: &str) -> AppResult<Staff> {
        Ok(Staff {
            meta: RecordMeta::new(author),
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            start_date: self.start_date,
            training: Vec::new(),
        })
    }
}

/// Training record owned by a staff member: Course → Dates → Review
#[derive(Debug, Clone, Default)]
pub struct TrainingForm {
    pub course: String,
    pub provider: Option<String>,
    pub completed_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
    pub certificate_ref: Option<String>,
}

impl WizardForm for TrainingForm {
    type Output = TrainingRecord;
    const STEPS: &'static [&'static str] = &["Course", "Dates", "Review"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => {
                require_text(&mut issues, "course", "Course", &self.course, MAX_NAME_LEN);
                limit_text(&mut issues, "provider", "Provider", &self.provider, MAX_NAME_LEN);
            }
            1 => {
                require(&mut issues, "completedOn", "Completion date", &self.completed_on);
                if let (Some(done), Some(expires)) = (self.completed_on, self.expires_on)
                    && expires < done
                {
                    issues.push(FieldIssue::new("expiresOn", "Expiry cannot be before completion"));
                }
            }
            2 => limit_text(&mut issues, "certificateRef", "Certificate", &self.certificate_ref, MAX_SHORT_TEXT_LEN),
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, _author: &str) -> AppResult<TrainingRecord> {
        let completed_on = self.completed_on.ok_or_else(|| AppError::required("completedOn"))?;
        Ok(TrainingRecord {
            id: record_id(),
            course: self.course.trim().to_string(),
            completed_on,
            expires_on: self.expires_on,
            certificate_ref: non_blank(&self.certificate_ref),
            provider: non_blank(&self.provider),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::training::add_training;
    use crate::wizards::Wizard;

    #[test]
    fn test_staff_then_training() {
        let mut staff = Wizard::new(StaffForm {
            name: "Rosa".into(),
            role: "Cook".into(),
            start_date: None,
        })
        .submit("manager")
        .unwrap();

        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day);
        let mut record = Wizard::new(TrainingForm {
            course: "Food Hygiene Level 2".into(),
            completed_on: d(2, 1),
            expires_on: d(1, 1),
            ..Default::default()
        });
        assert!(record.submit("manager").is_err());
        assert_eq!(record.step(), 1);

        record.form_mut().expires_on = None;
        let training = record.submit("manager").unwrap();
        add_training(&mut staff, training).unwrap();
        assert_eq!(staff.training.len(), 1);
        assert_eq!(staff.training[0].course, "Food Hygiene Level 2");
    }

    #[test]
    fn test_staff_role_required() {
        let form = StaffForm {
            name: "Sam".into(),
            ..Default::default()
        };
        assert!(form.check_step(0).is_empty());
        assert_eq!(form.check_step(1)[0].field, "role");
    }
}
