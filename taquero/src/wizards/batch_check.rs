//! Batch temperature check: Product → Reading → Action → Review

use shared::AppResult;
use shared::models::{BatchCheck, CheckKind, RecordMeta, TemperatureReading, Verdict};

use super::{FieldIssue, WizardForm, limit_text, require, require_temperature, require_text, unknown_step};
use crate::safety::classify;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, non_blank};

#[derive(Debug, Clone, Default)]
pub struct BatchCheckForm {
    pub product: String,
    pub kind: Option<CheckKind>,
    pub celsius: Option<f64>,
    /// Elapsed minutes, cooling checks only
    pub minutes: Option<u32>,
    pub corrective_action: Option<String>,
}

impl BatchCheckForm {
    pub fn reading(&self) -> Option<TemperatureReading> {
        self.celsius.map(|celsius| TemperatureReading {
            celsius,
            minutes: self.minutes,
        })
    }

    /// Live verdict shown while the reading is typed
    pub fn verdict(&self) -> Option<Verdict> {
        Some(classify(self.kind?, self.reading()?))
    }
}

impl WizardForm for BatchCheckForm {
    type Output = BatchCheck;
    const STEPS: &'static [&'static str] = &["Product", "Reading", "Action", "Review"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => {
                require_text(&mut issues, "product", "Product", &self.product, MAX_NAME_LEN);
                require(&mut issues, "kind", "Check type", &self.kind);
            }
            1 => {
                require_temperature(&mut issues, "celsius", "Temperature", self.celsius);
                if self.kind == Some(CheckKind::Cooling) && self.minutes.is_none() {
                    issues.push(FieldIssue::new("minutes", "Minutes since cooking started are required"));
                }
            }
            2 => {
                if self.verdict() == Some(Verdict::Unsafe) && non_blank(&self.corrective_action).is_none() {
                    issues.push(FieldIssue::new(
                        "correctiveAction",
                        "Unsafe reading: record the corrective action",
                    ));
                }
                limit_text(&mut issues, "correctiveAction", "Corrective action", &self.corrective_action, MAX_NOTE_LEN);
            }
            3 => {}
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, author: &str) -> AppResult<BatchCheck> {
        let (Some(kind), Some(reading)) = (self.kind, self.reading()) else {
            return Err(shared::AppError::required("reading"));
        };
        Ok(BatchCheck {
            meta: RecordMeta::new(author),
            product: self.product.trim().to_string(),
            kind,
            reading,
            verdict: classify(kind, reading),
            corrective_action: non_blank(&self.corrective_action),
        })
    }
}
