//! Event booking: Details → Schedule → Contact → Review

use chrono::NaiveDate;
use shared::{AppError, AppResult};
use shared::models::{Event, EventKind, RecordMeta};

use super::{FieldIssue, WizardForm, limit_text, require, require_text, unknown_step};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, non_blank};

#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub name: String,
    pub kind: EventKind,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub expected_covers: Option<u32>,
    pub contact: Option<String>,
    pub notes: Option<String>,
}

impl EventForm {
    /// Prefill from an existing event for editing
    pub fn from_event(event: &Event) -> Self {
        Self {
            name: event.name.clone(),
            kind: event.kind,
            date: Some(event.date),
            location: event.location.clone(),
            expected_covers: event.expected_covers,
            contact: event.contact.clone(),
            notes: event.notes.clone(),
        }
    }

    /// Copy the draft onto an existing event, keeping its audit fields
    pub fn apply_to(&self, event: &mut Event) -> AppResult<()> {
        let built = self.build(&event.meta.created_by)?;
        *event = Event {
            meta: event.meta.clone(),
            ..built
        };
        Ok(())
    }
}

impl WizardForm for EventForm {
    type Output = Event;
    const STEPS: &'static [&'static str] = &["Details", "Schedule", "Contact", "Review"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => require_text(&mut issues, "name", "Event name", &self.name, MAX_NAME_LEN),
            1 => {
                require(&mut issues, "date", "Date", &self.date);
                require_text(&mut issues, "location", "Location", &self.location, MAX_NAME_LEN);
                if self.expected_covers == Some(0) {
                    issues.push(FieldIssue::new("expectedCovers", "Expected covers must be above zero"));
                }
            }
            2 => {
                limit_text(&mut issues, "contact", "Contact", &self.contact, MAX_SHORT_TEXT_LEN);
                limit_text(&mut issues, "notes", "Notes", &self.notes, MAX_NOTE_LEN);
            }
            3 => {}
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, author: &str) -> AppResult<Event> {
        let date = self.date.ok_or_else(|| AppError::required("date"))?;
        Ok(Event {
            meta: RecordMeta::new(author),
            name: self.name.trim().to_string(),
            date,
            location: self.location.trim().to_string(),
            kind: self.kind,
            expected_covers: self.expected_covers,
            contact: non_blank(&self.contact),
            notes: non_blank(&self.notes),
        })
    }
}
