//! Safe method definition: Method → Rule → Review
//!
//! Batches are recorded afterwards with [`crate::safety::record_batch`].

use shared::{AppError, AppResult};
use shared::models::{CheckKind, DEFAULT_REQUIRED_BATCHES, Method, RecordMeta};

use super::{FieldIssue, WizardForm, limit_text, require, require_text, unknown_step};
use crate::safety::describe;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN};

/// Upper bound on validation batches per method
pub const MAX_REQUIRED_BATCHES: u32 = 10;

#[derive(Debug, Clone)]
pub struct MethodForm {
    pub name: String,
    pub kind: Option<CheckKind>,
    pub description: Option<String>,
    pub required_batches: u32,
}

impl Default for MethodForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: None,
            description: None,
            required_batches: DEFAULT_REQUIRED_BATCHES,
        }
    }
}

impl MethodForm {
    /// Rule shown on the review step
    pub fn rule(&self) -> Option<String> {
        self.kind.map(describe)
    }
}

impl WizardForm for MethodForm {
    type Output = Method;
    const STEPS: &'static [&'static str] = &["Method", "Rule", "Review"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => {
                require_text(&mut issues, "name", "Method name", &self.name, MAX_NAME_LEN);
                limit_text(&mut issues, "description", "Description", &self.description, MAX_NOTE_LEN);
            }
            1 => {
                require(&mut issues, "kind", "Check type", &self.kind);
                if !(1..=MAX_REQUIRED_BATCHES).contains(&self.required_batches) {
                    issues.push(FieldIssue::new(
                        "requiredBatches",
                        format!("Batches to validate must be between 1 and {MAX_REQUIRED_BATCHES}"),
                    ));
                }
            }
            2 => {}
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, author: &str) -> AppResult<Method> {
        let kind = self.kind.ok_or_else(|| AppError::required("kind"))?;
        Ok(Method {
            meta: RecordMeta::new(author),
            name: self.name.trim().to_string(),
            kind,
            description: self.description.as_deref().map(str::trim).unwrap_or_default().to_string(),
            required_batches: self.required_batches,
            batches: Vec::new(),
            validated_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizards::Wizard;

    #[test]
    fn test_method_defaults_to_three_batches() {
        let mut w = Wizard::new(MethodForm {
            name: "Slow-cooked barbacoa".into(),
            kind: Some(CheckKind::Cooking),
            ..Default::default()
        });
        assert_eq!(w.form().rule().as_deref(), Some("core ≥ 65 °C"));
        let method = w.submit("chef").unwrap();
        assert_eq!(method.required_batches, 3);
        assert!(!method.is_validated());
    }

    #[test]
    fn test_batch_count_bounds() {
        let mut form = MethodForm {
            name: "Rice cooling".into(),
            kind: Some(CheckKind::Cooling),
            required_batches: 0,
            ..Default::default()
        };
        assert_eq!(form.check_step(1)[0].field, "requiredBatches");
        form.required_batches = 11;
        assert_eq!(form.check_step(1).len(), 1);
        form.required_batches = 5;
        assert!(form.check_step(1).is_empty());
    }
}
