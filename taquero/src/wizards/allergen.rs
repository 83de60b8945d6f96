//! Allergen matrix entry: Dish → Ingredients → Allergens → Review

use shared::AppResult;
use shared::models::{Allergen, AllergenRecord, RecordMeta};

use super::{FieldIssue, WizardForm, limit_text, require_text, unknown_step};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, non_blank, normalize_list};

#[derive(Debug, Clone, Default)]
pub struct AllergenForm {
    pub dish_name: String,
    pub ingredients: Vec<String>,
    pub contains: Vec<Allergen>,
    pub may_contain: Vec<Allergen>,
    /// Explicit "contains none of the 14" confirmation
    pub confirmed_none: bool,
    pub notes: Option<String>,
}

impl AllergenForm {
    pub fn toggle_contains(&mut self, allergen: Allergen) {
        toggle(&mut self.contains, allergen);
        self.may_contain.retain(|a| *a != allergen);
    }

    pub fn toggle_may_contain(&mut self, allergen: Allergen) {
        toggle(&mut self.may_contain, allergen);
        self.contains.retain(|a| *a != allergen);
    }
}

fn toggle(list: &mut Vec<Allergen>, allergen: Allergen) {
    if let Some(pos) = list.iter().position(|a| *a == allergen) {
        list.remove(pos);
    } else {
        list.push(allergen);
    }
}

fn sorted(list: &[Allergen]) -> Vec<Allergen> {
    let mut out = list.to_vec();
    out.sort();
    out.dedup();
    out
}

impl WizardForm for AllergenForm {
    type Output = AllergenRecord;
    const STEPS: &'static [&'static str] = &["Dish", "Ingredients", "Allergens", "Review"];

    fn check_step(&self, step: usize) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match step {
            0 => require_text(&mut issues, "dishName", "Dish name", &self.dish_name, MAX_NAME_LEN),
            1 => {
                if normalize_list(&self.ingredients).is_empty() {
                    issues.push(FieldIssue::new("ingredients", "Add at least one ingredient"));
                }
            }
            2 => {
                if self.contains.is_empty() && self.may_contain.is_empty() && !self.confirmed_none {
                    issues.push(FieldIssue::new(
                        "contains",
                        "Tick the allergens present or confirm the dish contains none",
                    ));
                }
                if self.confirmed_none && !(self.contains.is_empty() && self.may_contain.is_empty()) {
                    issues.push(FieldIssue::new("confirmedNone", "Allergens ticked but \"none\" confirmed"));
                }
                if self.contains.iter().any(|a| self.may_contain.contains(a)) {
                    issues.push(FieldIssue::new(
                        "mayContain",
                        "An allergen cannot be both contained and a may-contain",
                    ));
                }
            }
            3 => limit_text(&mut issues, "notes", "Notes", &self.notes, MAX_NOTE_LEN),
            _ => return unknown_step(step),
        }
        issues
    }

    fn build(&self, author: &str) -> AppResult<AllergenRecord> {
        Ok(AllergenRecord {
            meta: RecordMeta::new(author),
            dish_name: self.dish_name.trim().to_string(),
            ingredients: normalize_list(&self.ingredients),
            contains: sorted(&self.contains),
            may_contain: sorted(&self.may_contain),
            notes: non_blank(&self.notes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizards::Wizard;
    use shared::ErrorCode;

    #[test]
    fn test_dish_name_gates_next() {
        let mut w = Wizard::<AllergenForm>::default();
        assert!(!w.can_advance());
        w.form_mut().dish_name = "Birria taco".into();
        assert!(w.can_advance());
        w.next().unwrap();
        assert_eq!(w.step_title(), "Ingredients");
    }

    #[test]
    fn test_allergens_need_selection_or_confirmation() {
        let mut form = AllergenForm {
            dish_name: "Salsa verde".into(),
            ingredients: vec!["tomatillo".into()],
            ..Default::default()
        };
        assert_eq!(form.check_step(2).len(), 1);
        form.confirmed_none = true;
        assert!(form.check_step(2).is_empty());
        form.toggle_contains(Allergen::Mustard);
        assert_eq!(form.check_step(2)[0].field, "confirmedNone");
    }

    #[test]
    fn test_toggle_moves_between_lists() {
        let mut form = AllergenForm::default();
        form.toggle_contains(Allergen::Milk);
        form.toggle_may_contain(Allergen::Milk);
        assert!(form.contains.is_empty());
        assert_eq!(form.may_contain, vec![Allergen::Milk]);
        form.toggle_may_contain(Allergen::Milk);
        assert!(form.may_contain.is_empty());
    }

    #[test]
    fn test_submit_normalizes() {
        let mut w = Wizard::new(AllergenForm {
            dish_name: "  Quesadilla ".into(),
            ingredients: vec!["tortilla".into(), " ".into(), "cheese".into(), "Cheese".into()],
            contains: vec![Allergen::Milk, Allergen::Gluten, Allergen::Milk],
            notes: Some("   ".into()),
            ..Default::default()
        });
        let record = w.submit("rosa").unwrap();
        assert_eq!(record.dish_name, "Quesadilla");
        assert_eq!(record.ingredients, vec!["tortilla", "cheese"]);
        assert_eq!(record.contains, vec![Allergen::Gluten, Allergen::Milk]);
        assert_eq!(record.notes, None);
        assert_eq!(record.meta.created_by, "rosa");
    }

    #[test]
    fn test_submit_without_ingredients_fails_on_step_one() {
        let mut w = Wizard::new(AllergenForm {
            dish_name: "Tamale".into(),
            confirmed_none: true,
            ..Default::default()
        });
        assert_eq!(w.submit("rosa").unwrap_err().code, ErrorCode::StepIncomplete);
        assert_eq!(w.step(), 1);
    }
}
