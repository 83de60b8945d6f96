//! Batch Check Model (ad hoc temperature checks)

use serde::{Deserialize, Serialize};

use super::{CheckKind, RecordMeta, TemperatureReading, Verdict};
use crate::impl_record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCheck {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub product: String,
    pub kind: CheckKind,
    pub reading: TemperatureReading,
    pub verdict: Verdict,
    /// What was done about an unsafe reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrective_action: Option<String>,
}

impl_record!(BatchCheck, "batch_checks", Hard);
