//! Temperature thresholds
//!
//! Boundary values are inclusive on the safe side: 65.0 °C passes a cooking
//! check, 8.0 °C passes a chilled check, 8.1 °C fails it.

use shared::models::{CheckKind, TemperatureReading, Verdict};

/// Minimum core temperature at the end of cooking
pub const COOKING_MIN_C: f64 = 65.0;
/// Minimum temperature while hot holding
pub const HOT_HOLDING_MIN_C: f64 = 63.0;
/// Minimum core temperature when reheating
pub const REHEATING_MIN_C: f64 = 75.0;
/// Cooling target and the time allowed to reach it
pub const COOLING_TARGET_C: f64 = 8.0;
pub const COOLING_MAX_MINUTES: u32 = 90;
/// Maximum temperature for chilled food (deliveries, transport)
pub const CHILLED_MAX_C: f64 = 8.0;
/// Maximum temperature for frozen food on delivery
pub const FROZEN_MAX_C: f64 = -15.0;

/// The rule a kind is checked against, for display
pub fn describe(kind: CheckKind) -> String {
    match kind {
        CheckKind::Cooking => format!("core ≥ {COOKING_MIN_C} °C"),
        CheckKind::HotHolding => format!("≥ {HOT_HOLDING_MIN_C} °C"),
        CheckKind::Reheating => format!("core ≥ {REHEATING_MIN_C} °C"),
        CheckKind::Cooling => {
            format!("≤ {COOLING_TARGET_C} °C within {COOLING_MAX_MINUTES} minutes")
        }
        CheckKind::Chilled => format!("≤ {CHILLED_MAX_C} °C"),
        CheckKind::Frozen => format!("≤ {FROZEN_MAX_C} °C"),
    }
}

/// Classify a reading; non-finite readings are always unsafe
///
/// A cooling reading without elapsed minutes cannot prove the curve and is
/// unsafe.
pub fn classify(kind: CheckKind, reading: TemperatureReading) -> Verdict {
    let t = reading.celsius;
    if !t.is_finite() {
        return Verdict::Unsafe;
    }
    let safe = match kind {
        CheckKind::Cooking => t >= COOKING_MIN_C,
        CheckKind::HotHolding => t >= HOT_HOLDING_MIN_C,
        CheckKind::Reheating => t >= REHEATING_MIN_C,
        CheckKind::Cooling => {
            t <= COOLING_TARGET_C && reading.minutes.is_some_and(|m| m <= COOLING_MAX_MINUTES)
        }
        CheckKind::Chilled => t <= CHILLED_MAX_C,
        CheckKind::Frozen => t <= FROZEN_MAX_C,
    };
    if safe { Verdict::Safe } else { Verdict::Unsafe }
}

/// Classify a bare temperature (kinds with no time component)
pub fn classify_celsius(kind: CheckKind, celsius: f64) -> Verdict {
    classify(kind, TemperatureReading::new(celsius))
}

/// Worst of two verdicts
pub fn worst(a: Verdict, b: Verdict) -> Verdict {
    if a.is_safe() && b.is_safe() {
        Verdict::Safe
    } else {
        Verdict::Unsafe
    }
}
