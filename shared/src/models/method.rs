//! Method Model (food handling procedures validated by batch checks)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CheckKind, RecordMeta, TemperatureReading, Verdict};
use crate::impl_record;

/// Number of passing batches a method needs unless configured otherwise
pub const DEFAULT_REQUIRED_BATCHES: u32 = 3;

fn default_required_batches() -> u32 {
    DEFAULT_REQUIRED_BATCHES
}

/// One validation batch recorded against a method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// 1-based position in the method's batch list
    pub number: u32,
    pub recorded_at: DateTime<Utc>,
    pub recorded_by: String,
    pub reading: TemperatureReading,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub kind: CheckKind,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_required_batches")]
    pub required_batches: u32,
    #[serde(default)]
    pub batches: Vec<Batch>,
    /// Set once `required_batches` passing batches are recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,
}

impl Method {
    pub fn passed_batches(&self) -> u32 {
        self.batches.iter().filter(|b| b.verdict.is_safe()).count() as u32
    }

    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some()
    }

    /// (passing batches, required batches)
    pub fn progress(&self) -> (u32, u32) {
        (self.passed_batches().min(self.required_batches), self.required_batches)
    }
}

impl_record!(Method, "methods", Soft);
