//! Transport Check Model (chilled food carried to events)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{RecordMeta, Verdict};
use crate::impl_record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportCheck {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub date: NaiveDate,
    pub vehicle: String,
    pub destination: String,
    pub departure_temp: f64,
    pub arrival_temp: f64,
    /// Worst of the departure and arrival verdicts
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrective_action: Option<String>,
}

impl_record!(TransportCheck, "transport_checks", Hard);
