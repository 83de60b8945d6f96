//! Event Model (catering jobs, markets, private bookings)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RecordMeta;
use crate::impl_record;

/// Kind of event the truck is booked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    #[default]
    Market,
    Festival,
    PrivateHire,
    Corporate,
    Wedding,
    Other,
}

/// Booked event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    #[serde(default)]
    pub kind: EventKind,
    /// Expected number of covers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_covers: Option<u32>,
    /// Organiser contact (name / phone / email, free text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl_record!(Event, "events", Soft);
