//! Allergen Model (per-dish allergen matrix)

use serde::{Deserialize, Serialize};

use super::RecordMeta;
use crate::impl_record;

/// The 14 allergens that must be declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allergen {
    Celery,
    Gluten,
    Crustaceans,
    Eggs,
    Fish,
    Lupin,
    Milk,
    Molluscs,
    Mustard,
    Nuts,
    Peanuts,
    Sesame,
    Soya,
    Sulphites,
}

impl Allergen {
    pub const ALL: [Allergen; 14] = [
        Allergen::Celery,
        Allergen::Gluten,
        Allergen::Crustaceans,
        Allergen::Eggs,
        Allergen::Fish,
        Allergen::Lupin,
        Allergen::Milk,
        Allergen::Molluscs,
        Allergen::Mustard,
        Allergen::Nuts,
        Allergen::Peanuts,
        Allergen::Sesame,
        Allergen::Soya,
        Allergen::Sulphites,
    ];
}

/// Allergen declaration for one dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergenRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub dish_name: String,
    pub ingredients: Vec<String>,
    /// Allergens present as ingredients
    #[serde(default)]
    pub contains: Vec<Allergen>,
    /// Cross-contamination risk
    #[serde(default)]
    pub may_contain: Vec<Allergen>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AllergenRecord {
    /// Whether the dish is unsafe for someone avoiding `allergen`
    pub fn affects(&self, allergen: Allergen) -> bool {
        self.contains.contains(&allergen) || self.may_contain.contains(&allergen)
    }
}

impl_record!(AllergenRecord, "allergens", Hard);
