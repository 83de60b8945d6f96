//! Temperature check types (classification rules live in `taquero::safety`)

use serde::{Deserialize, Serialize};

/// Kind of temperature rule a reading is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Core temperature at the end of cooking
    Cooking,
    /// Food kept hot for service
    HotHolding,
    /// Reheated food
    Reheating,
    /// Cooling curve: temperature reached after N minutes
    Cooling,
    /// Chilled goods (deliveries, transport)
    Chilled,
    /// Frozen goods (deliveries)
    Frozen,
}

impl CheckKind {
    pub const ALL: [CheckKind; 6] = [
        CheckKind::Cooking,
        CheckKind::HotHolding,
        CheckKind::Reheating,
        CheckKind::Cooling,
        CheckKind::Chilled,
        CheckKind::Frozen,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::Cooking => "cooking",
            CheckKind::HotHolding => "hot holding",
            CheckKind::Reheating => "reheating",
            CheckKind::Cooling => "cooling",
            CheckKind::Chilled => "chilled",
            CheckKind::Frozen => "frozen",
        }
    }
}

impl std::str::FromStr for CheckKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "cooking" | "cook" => Ok(CheckKind::Cooking),
            "hot_holding" | "hotholding" | "holding" => Ok(CheckKind::HotHolding),
            "reheating" | "reheat" => Ok(CheckKind::Reheating),
            "cooling" | "cool" => Ok(CheckKind::Cooling),
            "chilled" | "chill" | "transport" => Ok(CheckKind::Chilled),
            "frozen" | "freezer" => Ok(CheckKind::Frozen),
            other => Err(format!("unknown check kind: {other}")),
        }
    }
}

/// Outcome of checking a reading against its rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Safe,
    Unsafe,
}

impl Verdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, Verdict::Safe)
    }
}

/// A single temperature measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureReading {
    /// Degrees Celsius
    pub celsius: f64,
    /// Minutes elapsed since the start of the process (cooling curves)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
}

impl TemperatureReading {
    pub fn new(celsius: f64) -> Self {
        Self {
            celsius,
            minutes: None,
        }
    }

    pub fn after_minutes(celsius: f64, minutes: u32) -> Self {
        Self {
            celsius,
            minutes: Some(minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_kind_parse() {
        assert_eq!("hot-holding".parse::<CheckKind>(), Ok(CheckKind::HotHolding));
        assert_eq!("Cooling".parse::<CheckKind>(), Ok(CheckKind::Cooling));
        assert_eq!("transport".parse::<CheckKind>(), Ok(CheckKind::Chilled));
        assert!("boiling".parse::<CheckKind>().is_err());
    }

    #[test]
    fn test_reading_serde() {
        let r = TemperatureReading::after_minutes(7.5, 80);
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["celsius"], 7.5);
        assert_eq!(json["minutes"], 80);
        let plain = serde_json::to_value(TemperatureReading::new(70.0)).unwrap();
        assert!(plain.get("minutes").is_none());
    }
}
