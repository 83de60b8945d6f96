//! Supplier Model (approved supplier list)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RecordMeta;
use crate::impl_record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// What we buy from them
    #[serde(default)]
    pub products: Vec<String>,
    pub approved: bool,
    /// Food hygiene rating (0-5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hygiene_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<NaiveDate>,
}

impl_record!(SupplierRecord, "suppliers", Soft);
