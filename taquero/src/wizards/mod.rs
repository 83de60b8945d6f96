//! Multi-step form wizards
//!
//! A [`Wizard`] wraps a draft form and a step index. "Next" is gated by the
//! current step's requirements ([`WizardForm::check_step`]); submitting
//! re-checks every step and builds the record.
//!
//! ```text
//! Wizard<AllergenForm>
//!   step 0 "Dish"         dish name required
//!   step 1 "Ingredients"  at least one ingredient
//!   step 2 "Allergens"    allergens ticked, or "none" confirmed
//!   step 3 "Review"
//!   submit(author) -> AllergenRecord
//! ```

pub mod allergen;
pub mod b2b_sale;
pub mod batch_check;
pub mod complaint;
pub mod delivery;
pub mod event;
pub mod incident;
pub mod method;
pub mod supplier;
pub mod training;
pub mod transport;

pub use allergen::AllergenForm;
pub use b2b_sale::{B2bSaleForm, SaleLineDraft};
pub use batch_check::BatchCheckForm;
pub use complaint::ComplaintForm;
pub use delivery::DeliveryForm;
pub use event::EventForm;
pub use incident::IncidentForm;
pub use method::MethodForm;
pub use supplier::SupplierForm;
pub use training::{StaffForm, TrainingForm};
pub use transport::TransportForm;

use shared::{AppError, AppResult, ErrorCode};

/// One unmet requirement on a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A draft behind a wizard
pub trait WizardForm {
    type Output;

    /// Step titles, in order
    const STEPS: &'static [&'static str];

    /// Requirements of `step` that are not met yet (empty = step complete)
    fn check_step(&self, step: usize) -> Vec<FieldIssue>;

    /// Build the final record; only called once every step is complete
    fn build(&self, author: &str) -> AppResult<Self::Output>;
}

pub struct Wizard<F: WizardForm> {
    form: F,
    step: usize,
    reached: usize,
}

impl<F: WizardForm + Default> Default for Wizard<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F: WizardForm> Wizard<F> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            step: 0,
            reached: 0,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn step_title(&self) -> &'static str {
        F::STEPS[self.step]
    }

    pub fn step_count(&self) -> usize {
        F::STEPS.len()
    }

    /// Furthest step visited
    pub fn reached(&self) -> usize {
        self.reached
    }

    pub fn is_last(&self) -> bool {
        self.step + 1 == F::STEPS.len()
    }

    /// Unmet requirements on the current step
    pub fn issues(&self) -> Vec<FieldIssue> {
        self.form.check_step(self.step)
    }

    /// Whether "Next" is enabled
    pub fn can_advance(&self) -> bool {
        !self.is_last() && self.issues().is_empty()
    }

    /// Move to the next step
    pub fn next(&mut self) -> AppResult<usize> {
        if self.is_last() {
            return Err(AppError::with_message(
                ErrorCode::StepUnreachable,
                "Already on the last step, submit instead",
            ));
        }
        let issues = self.issues();
        if !issues.is_empty() {
            return Err(incomplete(self.step, F::STEPS[self.step], &issues));
        }
        self.step += 1;
        self.reached = self.reached.max(self.step);
        Ok(self.step)
    }

    /// Move to the previous step (no-op on the first step)
    pub fn back(&mut self) -> usize {
        self.step = self.step.saturating_sub(1);
        self.step
    }

    /// Jump to a step
    ///
    /// Any step already reached is open; further forward only when every
    /// step from the current one up to the target is complete. `submit`
    /// re-checks everything regardless.
    pub fn jump_to(&mut self, target: usize) -> AppResult<usize> {
        if target >= F::STEPS.len() {
            return Err(AppError::with_message(
                ErrorCode::StepUnreachable,
                format!("Step {target} does not exist"),
            ));
        }
        if target <= self.reached {
            self.step = target;
            return Ok(self.step);
        }
        for step in self.step..target {
            let issues = self.form.check_step(step);
            if !issues.is_empty() {
                return Err(incomplete(step, F::STEPS[step], &issues));
            }
        }
        self.step = target;
        self.reached = self.reached.max(target);
        Ok(self.step)
    }

    /// Re-check every step and build the record
    ///
    /// On failure the wizard moves to the first incomplete step.
    pub fn submit(&mut self, author: &str) -> AppResult<F::Output> {
        for step in 0..F::STEPS.len() {
            let issues = self.form.check_step(step);
            if !issues.is_empty() {
                self.step = step;
                return Err(incomplete(step, F::STEPS[step], &issues));
            }
        }
        self.form.build(author)
    }
}

fn incomplete(step: usize, title: &str, issues: &[FieldIssue]) -> AppError {
    let fields: Vec<&str> = issues.iter().map(|i| i.field).collect();
    let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
    AppError::with_message(ErrorCode::StepIncomplete, format!("{title}: {}", messages.join("; ")))
        .with_detail("step", step)
        .with_detail("fields", fields)
}

// ── Requirement helpers ─────────────────────────────────────────────

/// Non-blank text within a length limit
pub(crate) fn require_text(issues: &mut Vec<FieldIssue>, field: &'static str, label: &str, value: &str, max_len: usize) {
    let len = value.trim().chars().count();
    if len == 0 {
        issues.push(FieldIssue::new(field, format!("{label} is required")));
    } else if len > max_len {
        issues.push(FieldIssue::new(field, format!("{label} is too long (max {max_len})")));
    }
}

/// Optional text within a length limit
pub(crate) fn limit_text(issues: &mut Vec<FieldIssue>, field: &'static str, label: &str, value: &Option<String>, max_len: usize) {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        issues.push(FieldIssue::new(field, format!("{label} is too long (max {max_len})")));
    }
}

/// A value that must be chosen
pub(crate) fn require<T>(issues: &mut Vec<FieldIssue>, field: &'static str, label: &str, value: &Option<T>) {
    if value.is_none() {
        issues.push(FieldIssue::new(field, format!("{label} is required")));
    }
}

/// A probe temperature that must be entered and plausible
pub(crate) fn require_temperature(issues: &mut Vec<FieldIssue>, field: &'static str, label: &str, value: Option<f64>) {
    match value {
        None => issues.push(FieldIssue::new(field, format!("{label} is required"))),
        Some(t) => check_temperature(issues, field, label, t),
    }
}

pub(crate) fn check_temperature(issues: &mut Vec<FieldIssue>, field: &'static str, label: &str, t: f64) {
    if crate::utils::validation::validate_temperature(t, field).is_err() {
        issues.push(FieldIssue::new(field, format!("{label} must be a probe reading in °C")));
    }
}

/// Issue for a step index the form does not have
pub(crate) fn unknown_step(step: usize) -> Vec<FieldIssue> {
    vec![FieldIssue::new("step", format!("unknown step {step}"))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct TwoFields {
        first: String,
        second: String,
    }

    impl WizardForm for TwoFields {
        type Output = String;
        const STEPS: &'static [&'static str] = &["First", "Second", "Review"];

        fn check_step(&self, step: usize) -> Vec<FieldIssue> {
            let mut issues = Vec::new();
            match step {
                0 => require_text(&mut issues, "first", "First", &self.first, 10),
                1 => require_text(&mut issues, "second", "Second", &self.second, 10),
                2 => {}
                _ => return unknown_step(step),
            }
            issues
        }

        fn build(&self, author: &str) -> AppResult<String> {
            Ok(format!("{} {} by {author}", self.first, self.second))
        }
    }

    #[test]
    fn test_next_disabled_until_required_filled() {
        let mut w = Wizard::<TwoFields>::default();
        assert!(!w.can_advance());
        let err = w.next().unwrap_err();
        assert_eq!(err.code, ErrorCode::StepIncomplete);
        assert_eq!(err.message, "First: First is required");
        assert_eq!(w.step(), 0);

        w.form_mut().first = "a".into();
        assert!(w.can_advance());
        assert_eq!(w.next().unwrap(), 1);
        assert_eq!(w.step_title(), "Second");
    }

    #[test]
    fn test_whitespace_does_not_count() {
        let mut w = Wizard::<TwoFields>::default();
        w.form_mut().first = "   ".into();
        assert!(!w.can_advance());
    }

    #[test]
    fn test_back_and_bounds() {
        let mut w = Wizard::<TwoFields>::default();
        assert_eq!(w.back(), 0);
        w.form_mut().first = "a".into();
        w.form_mut().second = "b".into();
        w.next().unwrap();
        w.next().unwrap();
        assert!(w.is_last());
        assert!(!w.can_advance());
        assert_eq!(w.next().unwrap_err().code, ErrorCode::StepUnreachable);
        assert_eq!(w.back(), 1);
        assert_eq!(w.reached(), 2);
    }

    #[test]
    fn test_jump_forward_requires_intermediate_steps() {
        let mut w = Wizard::<TwoFields>::default();
        w.form_mut().first = "a".into();
        let err = w.jump_to(2).unwrap_err();
        assert_eq!(err.detail("step"), Some(&serde_json::Value::from(1)));
        w.form_mut().second = "b".into();
        assert_eq!(w.jump_to(2).unwrap(), 2);
        assert_eq!(w.jump_to(0).unwrap(), 0);
        assert_eq!(w.jump_to(3).unwrap_err().code, ErrorCode::StepUnreachable);
    }

    #[test]
    fn test_jump_to_reached_step_after_clearing_field() {
        let mut w = Wizard::<TwoFields>::default();
        w.form_mut().first = "a".into();
        w.form_mut().second = "b".into();
        w.jump_to(2).unwrap();
        w.jump_to(0).unwrap();
        w.form_mut().first.clear();

        assert_eq!(w.jump_to(2).unwrap(), 2);
        assert_eq!(w.reached(), 2);
        // still caught on submit
        assert_eq!(w.submit("ana").unwrap_err().code, ErrorCode::StepIncomplete);
        assert_eq!(w.step(), 0);
    }

    #[test]
    fn test_submit_moves_to_first_incomplete_step() {
        let mut w = Wizard::<TwoFields>::default();
        w.form_mut().first = "a".into();
        w.next().unwrap();
        w.form_mut().first.clear();
        let err = w.submit("ana").unwrap_err();
        assert_eq!(err.code, ErrorCode::StepIncomplete);
        assert_eq!(w.step(), 0);

        w.form_mut().first = "a".into();
        w.form_mut().second = "b".into();
        assert_eq!(w.submit("ana").unwrap(), "a b by ana");
    }
}
