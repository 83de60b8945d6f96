//! Goods-in acceptance

use shared::models::{CheckKind, Verdict};

use super::thresholds::{classify_celsius, describe};

/// Outcome of a delivery check with the reasons for a rejection
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryAssessment {
    pub verdict: Verdict,
    pub reasons: Vec<String>,
}

impl DeliveryAssessment {
    pub fn acceptable(&self) -> bool {
        self.verdict.is_safe()
    }
}

/// Every recorded temperature must be safe and packaging intact
pub fn assess_delivery(chilled: Option<f64>, frozen: Option<f64>, packaging_ok: bool) -> DeliveryAssessment {
    let mut reasons = Vec::new();
    if let Some(t) = chilled
        && !classify_celsius(CheckKind::Chilled, t).is_safe()
    {
        reasons.push(format!("chilled goods at {t} °C (must be {})", describe(CheckKind::Chilled)));
    }
    if let Some(t) = frozen
        && !classify_celsius(CheckKind::Frozen, t).is_safe()
    {
        reasons.push(format!("frozen goods at {t} °C (must be {})", describe(CheckKind::Frozen)));
    }
    if !packaging_ok {
        reasons.push("packaging damaged".to_string());
    }
    DeliveryAssessment {
        verdict: if reasons.is_empty() { Verdict::Safe } else { Verdict::Unsafe },
        reasons,
    }
}
