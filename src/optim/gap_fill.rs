//! Booster selection for persistent macro shortfalls.
//!
//! Rescaling existing portions cannot close a gap when no ingredient
//! carries the missing macro (a salmon-and-spinach meal has no carbs to
//! scale up). The advisor detects shortfalls past an absolute-gram
//! threshold and appends one booster ingredient per deficient macro,
//! filtered by dietary constraints and scored by capped nutrient density.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ingredient::Ingredient;
use crate::lookup::food_table::BoosterFood;
use crate::lookup::NutritionLookup;
use crate::nutrition::{MacroAxis, NutrientProfile};
use crate::optim::optimizer::target_value;
use crate::optim::targets::TargetMacros;

/// Restrictions and allergies a meal must respect. Matching is by name
/// token, case-insensitive: restrictions exclude whole token groups,
/// allergies exclude any candidate whose name contains the allergen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DietaryConstraint {
    pub restrictions: HashSet<String>,
    pub allergies: HashSet<String>,
}

const MEAT_TOKENS: &[&str] = &[
    "chicken", "turkey", "beef", "pork", "fish", "salmon", "tuna", "shrimp",
];
const EGG_DAIRY_TOKENS: &[&str] = &["egg", "yogurt", "cheese", "milk", "whey", "cottage"];
const DAIRY_TOKENS: &[&str] = &["yogurt", "cheese", "milk", "whey", "butter", "cottage"];
const GLUTEN_TOKENS: &[&str] = &["wheat", "bread", "pasta", "flour", "couscous", "oats"];

impl DietaryConstraint {
    pub fn new<R, A>(restrictions: R, allergies: A) -> Self
    where
        R: IntoIterator<Item = String>,
        A: IntoIterator<Item = String>,
    {
        Self {
            restrictions: restrictions
                .into_iter()
                .map(|r| r.trim().to_lowercase().replace([' ', '_'], "-"))
                .collect(),
            allergies: allergies.into_iter().map(|a| a.trim().to_lowercase()).collect(),
        }
    }

    fn has(&self, restriction: &str) -> bool {
        self.restrictions.contains(restriction)
    }

    /// Whether a candidate food name passes every active restriction and
    /// allergy. Unknown restriction strings are ignored.
    pub fn permits(&self, candidate_name: &str) -> bool {
        let name = candidate_name.to_lowercase();
        let contains_any = |tokens: &[&str]| tokens.iter().any(|t| name.contains(t));

        if self.allergies.iter().any(|allergen| name.contains(allergen)) {
            return false;
        }
        if (self.has("vegetarian") || self.has("vegan")) && contains_any(MEAT_TOKENS) {
            return false;
        }
        if self.has("vegan") && contains_any(EGG_DAIRY_TOKENS) {
            return false;
        }
        if self.has("dairy-free") && contains_any(DAIRY_TOKENS) {
            return false;
        }
        if self.has("gluten-free") && contains_any(GLUTEN_TOKENS) {
            return false;
        }
        true
    }
}

/// Gap thresholds and booster amount clamps, in absolute grams. Absolute
/// rather than percentage triggers: percentage shortfalls are unstable
/// near zero targets.
#[derive(Debug, Clone, Copy)]
pub struct GapFillConfig {
    pub protein_trigger_g: f32,
    pub carb_trigger_g: f32,
    pub fat_trigger_g: f32,
    pub protein_amount_range_g: (f32, f32),
    pub carb_amount_range_g: (f32, f32),
    pub fat_amount_range_g: (f32, f32),
}

impl Default for GapFillConfig {
    fn default() -> Self {
        Self {
            protein_trigger_g: 5.0,
            carb_trigger_g: 8.0,
            fat_trigger_g: 3.0,
            protein_amount_range_g: (20.0, 200.0),
            carb_amount_range_g: (30.0, 300.0),
            fat_amount_range_g: (5.0, 50.0),
        }
    }
}

impl GapFillConfig {
    fn trigger_for(&self, axis: MacroAxis) -> Option<f32> {
        match axis {
            MacroAxis::Protein => Some(self.protein_trigger_g),
            MacroAxis::Carbs => Some(self.carb_trigger_g),
            MacroAxis::Fat => Some(self.fat_trigger_g),
            MacroAxis::Calories => None,
        }
    }

    fn amount_range_for(&self, axis: MacroAxis) -> (f32, f32) {
        match axis {
            MacroAxis::Protein => self.protein_amount_range_g,
            MacroAxis::Carbs => self.carb_amount_range_g,
            MacroAxis::Fat => self.fat_amount_range_g,
            MacroAxis::Calories => (0.0, 0.0),
        }
    }
}

#[derive(Debug, Default)]
pub struct GapFillAdvisor {
    config: GapFillConfig,
}

impl GapFillAdvisor {
    pub fn new(config: GapFillConfig) -> Self {
        Self { config }
    }

    /// Proposes booster ingredients for every macro whose shortfall
    /// exceeds its trigger. Returns new ingredients only; the existing
    /// list is never modified or reduced. A macro whose candidate pool
    /// empties after dietary filtering is skipped silently.
    pub fn fill_gaps(
        &self,
        achieved: &NutrientProfile,
        target: &TargetMacros,
        constraint: &DietaryConstraint,
        lookup: &NutritionLookup,
    ) -> Vec<Ingredient> {
        let mut additions = Vec::new();

        for axis in [MacroAxis::Protein, MacroAxis::Carbs, MacroAxis::Fat] {
            let Some(trigger) = self.config.trigger_for(axis) else {
                continue;
            };
            let gap = target_value(target, axis) - achieved.value_of(axis);
            if gap <= trigger {
                continue;
            }

            match self.pick_booster(axis, gap, constraint, lookup) {
                Some(ingredient) => {
                    info!(
                        "gap-fill: adding {:.0} g {} to close a {:.1} g {} gap",
                        ingredient.amount_g,
                        ingredient.name,
                        gap,
                        axis.label()
                    );
                    additions.push(ingredient);
                }
                None => {
                    debug!(
                        "gap-fill: no eligible booster for {} gap of {:.1} g",
                        axis.label(),
                        gap
                    );
                }
            }
        }

        additions
    }

    /// Highest-scoring eligible booster for one macro gap. The score
    /// `efficiency * min(1, gap / (efficiency * 2))` rewards nutrient
    /// density but caps it, so an extremely dense food (pure oil against
    /// a small fat gap) cannot dominate when only a little is needed.
    fn pick_booster(
        &self,
        axis: MacroAxis,
        gap: f32,
        constraint: &DietaryConstraint,
        lookup: &NutritionLookup,
    ) -> Option<Ingredient> {
        let best = lookup
            .booster_pool(axis)
            .into_iter()
            .filter(|candidate| constraint.permits(&candidate.name))
            .filter(|candidate| candidate.profile.value_of(axis) > 0.0)
            .map(|candidate| {
                let efficiency = candidate.profile.value_of(axis);
                let score = efficiency * (gap / (efficiency * 2.0)).min(1.0);
                (candidate, efficiency, score)
            })
            .max_by(|a, b| a.2.total_cmp(&b.2))?;

        let (candidate, efficiency, _) = best;
        let (min_g, max_g) = self.config.amount_range_for(axis);
        let amount = (gap / efficiency * 100.0).clamp(min_g, max_g);

        Some(booster_ingredient(candidate, amount))
    }
}

fn booster_ingredient(candidate: &BoosterFood, amount_g: f32) -> Ingredient {
    let mut ingredient = Ingredient::new(&candidate.name, amount_g);
    // The booster table already declares the category; trust it over
    // re-classification.
    ingredient.category = candidate.category;
    // The computed amount may exceed the name-derived optimizer bound
    // (e.g. an oil booster); keep it consistent so a re-solve cannot
    // escape the bound either.
    ingredient.amount_g = ingredient.bounds.clamp(amount_g);
    ingredient
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::cache::MemoryStore;

    fn lookup() -> NutritionLookup {
        NutritionLookup::new(Box::new(MemoryStore::new()))
    }

    fn unconstrained() -> DietaryConstraint {
        DietaryConstraint::default()
    }

    #[test]
    fn test_no_gap_no_additions() {
        let advisor = GapFillAdvisor::default();
        let achieved = NutrientProfile::new(400.0, 34.0, 44.0, 11.0);
        let target = TargetMacros::new(400.0, 35.0, 45.0, 12.0);

        let additions = advisor.fill_gaps(&achieved, &target, &unconstrained(), &lookup());
        assert!(additions.is_empty());
    }

    #[test]
    fn test_carb_gap_adds_carb_booster() {
        let advisor = GapFillAdvisor::default();
        let achieved = NutrientProfile::new(300.0, 35.0, 1.0, 12.0);
        let target = TargetMacros::new(400.0, 35.0, 45.0, 12.0);

        let additions = advisor.fill_gaps(&achieved, &target, &unconstrained(), &lookup());
        assert_eq!(additions.len(), 1);
        let booster = &additions[0];
        assert!(matches!(
            booster.category,
            crate::ingredient::Category::Carb | crate::ingredient::Category::Fruit
        ));
        assert!(booster.amount_g >= 30.0 && booster.amount_g <= 300.0);
    }

    #[test]
    fn test_overshoot_is_not_a_gap() {
        let advisor = GapFillAdvisor::default();
        // Achieved protein far above target: negative gap, no trigger.
        let achieved = NutrientProfile::new(500.0, 80.0, 50.0, 15.0);
        let target = TargetMacros::new(400.0, 35.0, 45.0, 12.0);

        let additions = advisor.fill_gaps(&achieved, &target, &unconstrained(), &lookup());
        assert!(additions.is_empty());
    }

    #[test]
    fn test_vegan_excludes_meat_and_dairy_boosters() {
        let advisor = GapFillAdvisor::default();
        let constraint = DietaryConstraint::new(vec!["vegan".to_string()], vec![]);
        let achieved = NutrientProfile::new(100.0, 2.0, 40.0, 10.0);
        let target = TargetMacros::new(400.0, 40.0, 45.0, 12.0);

        let additions = advisor.fill_gaps(&achieved, &target, &constraint, &lookup());
        assert!(!additions.is_empty());
        let forbidden = ["chicken", "turkey", "beef", "egg", "yogurt", "cheese", "tuna", "whey", "cottage"];
        for added in &additions {
            let name = added.name.to_lowercase();
            assert!(
                forbidden.iter().all(|t| !name.contains(t)),
                "vegan constraint violated by '{}'",
                added.name
            );
        }
    }

    #[test]
    fn test_allergy_excludes_candidates_by_substring() {
        let advisor = GapFillAdvisor::default();
        let constraint = DietaryConstraint::new(vec![], vec!["peanut".to_string()]);
        let achieved = NutrientProfile::new(300.0, 35.0, 45.0, 2.0);
        let target = TargetMacros::new(400.0, 35.0, 45.0, 12.0);

        let additions = advisor.fill_gaps(&achieved, &target, &constraint, &lookup());
        for added in &additions {
            assert!(!added.name.to_lowercase().contains("peanut"));
        }
    }

    #[test]
    fn test_restriction_normalization() {
        let constraint = DietaryConstraint::new(
            vec!["Dairy Free".to_string()],
            vec![],
        );
        assert!(!constraint.permits("greek yogurt"));
        assert!(constraint.permits("sweet potato"));
    }

    #[test]
    fn test_small_fat_gap_prefers_moderate_candidate_over_pure_oil() {
        let advisor = GapFillAdvisor::default();
        // 4 g fat gap: the capped score stops pure oil from dominating.
        let achieved = NutrientProfile::new(400.0, 35.0, 45.0, 8.0);
        let target = TargetMacros::new(450.0, 35.0, 45.0, 12.0);

        let additions = advisor.fill_gaps(&achieved, &target, &unconstrained(), &lookup());
        assert_eq!(additions.len(), 1);
        // Amount clamp keeps the addition sane regardless of the winner.
        assert!(additions[0].amount_g >= 5.0 && additions[0].amount_g <= 50.0);
    }

    #[test]
    fn test_no_eligible_booster_skips_macro_silently() {
        let advisor = GapFillAdvisor::default();
        // Allergies that wipe out the whole protein pool.
        let constraint = DietaryConstraint::new(
            vec!["vegan".to_string()],
            vec!["tofu".to_string(), "lentil".to_string()],
        );
        let achieved = NutrientProfile::new(300.0, 5.0, 45.0, 12.0);
        let target = TargetMacros::new(400.0, 40.0, 45.0, 12.0);

        let additions = advisor.fill_gaps(&achieved, &target, &constraint, &lookup());
        assert!(additions.is_empty());
    }
}
