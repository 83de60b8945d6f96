//! Staff Model (staff members and their training records)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RecordMeta;
use crate::impl_record;

/// One completed course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecord {
    pub id: String,
    pub course: String,
    pub completed_on: NaiveDate,
    /// Refresher due date, if the course expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_ref: Option<String>,
    /// Trainer or provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub training: Vec<TrainingRecord>,
}

impl_record!(Staff, "staff", Soft);
