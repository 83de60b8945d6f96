//! Goods-in: Supplier → Items → Temperatures → Review

use chrono::NaiveDateTime;
use shared::{AppError, AppResult};
use shared::models::{Delivery, DeliveryItem, RecordMeta};

use super::{FieldIssue, WizardForm, check_temperature, limit_text, require, require_text, unknown_step};
use crate::safety::{DeliveryAssessment, assess_delivery};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, non_blank};

#[derive(Debug, Clone)]
pub struct DeliveryForm {
    pub supplier: String,
    pub received_at: Option<NaiveDateTime>,
    pub items: Vec<DeliveryItem>,
    pub chilled_temp: Option<f64>,
    pub frozen_temp: Option<f64>,
    pub packaging_ok: bool,
    pub notes: Option<String>,
}

impl Default for DeliveryForm {
    fn default() -> Self {
        Self {
            supplier: String::new(),
            received_at: None,
            items: Vec::new(),
            chilled_temp: None,
            frozen_temp: None,
            packaging_ok: true,
            notes: None,
        }
    }
}

impl DeliveryForm {
    pub fn add_item(&mut self, name: impl Into<String>, quantity: impl Into<String>) {
        self.items.push(DeliveryItem {
            name: name.into(),
            quantity: quantity.into(),
        });
    }

    pub fn assessment(&self) -> DeliveryAssessment {
        assess_delivery(self.chilled_temp, self.frozen_temp, self.packaging_ok)
    }

    fn named_items(&self) -> Vec<DeliveryItem> {
        self.items
            .iter()
            .filter(|i| !i.name.trim().is_empty())
            .map(|i| DeliveryItem {
                name: i.name.trim().to_string(),
                quantity: i.quantity.trim().to_string(),
            })
            .collect()
    }
}

impl WizardForm for DeliveryForm {
    type Output = Delivery;
    const STEPS: &'static [&'static str] = &["Supplier", "Items", "Temperatures", "Review"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => {
                require_text(&mut issues, "supplier", "Supplier", &self.supplier, MAX_NAME_LEN);
                require(&mut issues, "receivedAt", "Time received", &self.received_at);
            }
            1 => {
                if self.named_items().is_empty() {
                    issues.push(FieldIssue::new("items", "Add at least one item"));
                }
            }
            2 => {
                if let Some(t) = self.chilled_temp {
                    check_temperature(&mut issues, "chilledTemp", "Chilled temperature", t);
                }
                if let Some(t) = self.frozen_temp {
                    check_temperature(&mut issues, "frozenTemp", "Frozen temperature", t);
                }
                if issues.is_empty() && !self.assessment().acceptable() && non_blank(&self.notes).is_none() {
                    issues.push(FieldIssue::new("notes", "Delivery rejected: note what happened to the goods"));
                }
                limit_text(&mut issues, "notes", "Notes", &self.notes, MAX_NOTE_LEN);
            }
            3 => {}
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, author: &str) -> AppResult<Delivery> {
        let received_at = self.received_at.ok_or_else(|| AppError::required("receivedAt"))?;
        Ok(Delivery {
            meta: RecordMeta::new(author),
            supplier: self.supplier.trim().to_string(),
            received_at,
            items: self.named_items(),
            chilled_temp: self.chilled_temp,
            frozen_temp: self.frozen_temp,
            packaging_ok: self.packaging_ok,
            accepted: self.assessment().acceptable(),
            notes: non_blank(&self.notes),
        })
    }
}
