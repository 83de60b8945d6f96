//! Complaint Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RecordMeta;
use crate::impl_record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintChannel {
    #[default]
    InPerson,
    Phone,
    Email,
    Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    #[default]
    Quality,
    Illness,
    Allergen,
    ForeignObject,
    Service,
}

impl ComplaintCategory {
    /// Categories that must be treated as a food safety matter
    pub fn is_food_safety(&self) -> bool {
        matches!(
            self,
            ComplaintCategory::Illness | ComplaintCategory::Allergen | ComplaintCategory::ForeignObject
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub received_on: NaiveDate,
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_contact: Option<String>,
    pub channel: ComplaintChannel,
    pub category: ComplaintCategory,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default)]
    pub resolved: bool,
}

impl_record!(Complaint, "complaints", Soft);
