//! Transport check: Trip → Temperatures → Action

use chrono::NaiveDate;
use shared::{AppError, AppResult};
use shared::models::{CheckKind, RecordMeta, TransportCheck, Verdict};

use super::{FieldIssue, WizardForm, limit_text, require, require_temperature, require_text, unknown_step};
use crate::safety::{classify_celsius, worst};
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, non_blank};

#[derive(Debug, Clone, Default)]
pub struct TransportForm {
    pub date: Option<NaiveDate>,
    pub vehicle: String,
    pub destination: String,
    pub departure_temp: Option<f64>,
    pub arrival_temp: Option<f64>,
    pub corrective_action: Option<String>,
}

impl TransportForm {
    /// Unsafe when either end of the trip is above the chilled limit
    pub fn verdict(&self) -> Option<Verdict> {
        let departure = classify_celsius(CheckKind::Chilled, self.departure_temp?);
        let arrival = classify_celsius(CheckKind::Chilled, self.arrival_temp?);
        Some(worst(departure, arrival))
    }
}

impl WizardForm for TransportForm {
    type Output = TransportCheck;
    const STEPS: &'static [&'static str] = &["Trip", "Temperatures", "Action"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => {
                require(&mut issues, "date", "Date", &self.date);
                require_text(&mut issues, "vehicle", "Vehicle", &self.vehicle, MAX_SHORT_TEXT_LEN);
                require_text(&mut issues, "destination", "Destination", &self.destination, MAX_SHORT_TEXT_LEN);
            }
            1 => {
                require_temperature(&mut issues, "departureTemp", "Departure temperature", self.departure_temp);
                require_temperature(&mut issues, "arrivalTemp", "Arrival temperature", self.arrival_temp);
            }
            2 => {
                if self.verdict() == Some(Verdict::Unsafe) && non_blank(&self.corrective_action).is_none() {
                    issues.push(FieldIssue::new(
                        "correctiveAction",
                        "Goods above 8 °C: record the corrective action",
                    ));
                }
                limit_text(&mut issues, "correctiveAction", "Corrective action", &self.corrective_action, MAX_NOTE_LEN);
            }
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, author: &str) -> AppResult<TransportCheck> {
        let (Some(date), Some(departure_temp), Some(arrival_temp), Some(verdict)) =
            (self.date, self.departure_temp, self.arrival_temp, self.verdict())
        else {
            return Err(AppError::required("temperatures"));
        };
        Ok(TransportCheck {
            meta: RecordMeta::new(author),
            date,
            vehicle: self.vehicle.trim().to_string(),
            destination: self.destination.trim().to_string(),
            departure_temp,
            arrival_temp,
            verdict,
            corrective_action: non_blank(&self.corrective_action),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizards::Wizard;

    fn trip(departure: f64, arrival: f64) -> TransportForm {
        TransportForm {
            date: NaiveDate::from_ymd_opt(2024, 7, 6),
            vehicle: "Van 1".into(),
            destination: "Riverside market".into(),
            departure_temp: Some(departure),
            arrival_temp: Some(arrival),
            corrective_action: None,
        }
    }

    #[test]
    fn test_eight_degrees_is_still_safe() {
        assert_eq!(trip(3.0, 8.0).verdict(), Some(Verdict::Safe));
        assert_eq!(trip(3.0, 8.1).verdict(), Some(Verdict::Unsafe));
        assert_eq!(trip(9.0, 4.0).verdict(), Some(Verdict::Unsafe));
    }

    #[test]
    fn test_warm_arrival_requires_action() {
        let mut w = Wizard::new(trip(4.0, 11.0));
        assert!(w.submit("sam").is_err());
        assert_eq!(w.step(), 2);
        w.form_mut().corrective_action = Some("Discarded dairy".into());
        let check = w.submit("sam").unwrap();
        assert_eq!(check.verdict, Verdict::Unsafe);
        assert_eq!(check.arrival_temp, 11.0);
    }
}
