//! Delivery Model (goods-in checks)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::RecordMeta;
use crate::impl_record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryItem {
    pub name: String,
    /// Free text quantity as written on the delivery note ("2 x 5kg")
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub supplier: String,
    pub received_at: NaiveDateTime,
    #[serde(default)]
    pub items: Vec<DeliveryItem>,
    /// Probe temperature of chilled goods, if any were delivered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chilled_temp: Option<f64>,
    /// Probe temperature of frozen goods, if any were delivered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_temp: Option<f64>,
    pub packaging_ok: bool,
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl_record!(Delivery, "deliveries", Hard);
