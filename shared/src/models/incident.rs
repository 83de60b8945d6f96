//! Incident Model (accidents, near misses, food safety incidents)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::RecordMeta;
use crate::impl_record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentCategory {
    Injury,
    FoodSafety,
    Equipment,
    Pest,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub occurred_at: NaiveDateTime,
    pub location: String,
    pub category: IncidentCategory,
    pub severity: Severity,
    pub description: String,
    pub action_taken: String,
    /// Person or authority the incident was reported to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_to: Option<String>,
}

impl_record!(Incident, "incidents", Soft);
