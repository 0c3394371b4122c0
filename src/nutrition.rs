use serde::{Deserialize, Serialize};

use crate::ingredient::Ingredient;

/// Macro-nutrient composition per 100 g of a food, the reference portion
/// used by food databases.
///
/// Source data does not reliably satisfy the 4/4/9 kcal identity, so
/// calories are carried as an independent field and never re-derived from
/// the macro grams.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct NutrientProfile {
    pub calories: f32,
    pub protein_g: f32,
    pub carbs_g: f32,
    pub fat_g: f32,
    #[serde(default)]
    pub fiber_g: f32,
}

impl NutrientProfile {
    pub fn new(calories: f32, protein_g: f32, carbs_g: f32, fat_g: f32) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
            fiber_g: 0.0,
        }
    }

    /// Scales all values by a multiplier, e.g. `grams / 100.0` to go from
    /// a per-100g profile to the contribution of an actual portion.
    pub fn scale(&self, multiplier: f32) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein_g: self.protein_g * multiplier,
            carbs_g: self.carbs_g * multiplier,
            fat_g: self.fat_g * multiplier,
            fiber_g: self.fiber_g * multiplier,
        }
    }

    pub fn add(&self, other: &NutrientProfile) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein_g: self.protein_g + other.protein_g,
            carbs_g: self.carbs_g + other.carbs_g,
            fat_g: self.fat_g + other.fat_g,
            fiber_g: self.fiber_g + other.fiber_g,
        }
    }

    pub fn value_of(&self, axis: MacroAxis) -> f32 {
        match axis {
            MacroAxis::Calories => self.calories,
            MacroAxis::Protein => self.protein_g,
            MacroAxis::Carbs => self.carbs_g,
            MacroAxis::Fat => self.fat_g,
        }
    }
}

impl std::ops::Add for NutrientProfile {
    type Output = NutrientProfile;

    fn add(self, other: NutrientProfile) -> NutrientProfile {
        NutrientProfile::add(&self, &other)
    }
}

impl std::iter::Sum for NutrientProfile {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientProfile::default(), |acc, p| acc + p)
    }
}

/// The four optimization axes. Calories are derived data in most sources
/// but are still targeted (and weighted) independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroAxis {
    Calories,
    Protein,
    Carbs,
    Fat,
}

impl MacroAxis {
    pub const ALL: [MacroAxis; 4] = [
        MacroAxis::Calories,
        MacroAxis::Protein,
        MacroAxis::Carbs,
        MacroAxis::Fat,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MacroAxis::Calories => "calories",
            MacroAxis::Protein => "protein",
            MacroAxis::Carbs => "carbs",
            MacroAxis::Fat => "fat",
        }
    }
}

/// Sums per-ingredient contributions (`amount_g / 100 * profile`) into the
/// achieved totals for a meal. `profiles` must be index-aligned with
/// `ingredients`.
pub fn meal_totals(ingredients: &[Ingredient], profiles: &[NutrientProfile]) -> NutrientProfile {
    ingredients
        .iter()
        .zip(profiles.iter())
        .map(|(ingredient, profile)| profile.scale(ingredient.amount_g / 100.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::Ingredient;

    #[test]
    fn test_scale_and_add() {
        let chicken = NutrientProfile::new(165.0, 31.0, 0.0, 3.6);
        let half = chicken.scale(0.5);
        assert_eq!(half.calories, 82.5);
        assert_eq!(half.protein_g, 15.5);

        let doubled = half.add(&half);
        assert_eq!(doubled.protein_g, chicken.protein_g);
        assert_eq!(doubled.fat_g, chicken.fat_g);
    }

    #[test]
    fn test_meal_totals_matches_manual_sum() {
        let ingredients = vec![
            Ingredient::new("chicken breast", 200.0),
            Ingredient::new("white rice", 150.0),
        ];
        let profiles = vec![
            NutrientProfile::new(165.0, 31.0, 0.0, 3.6),
            NutrientProfile::new(130.0, 2.7, 28.0, 0.3),
        ];

        let totals = meal_totals(&ingredients, &profiles);
        assert!((totals.protein_g - (31.0 * 2.0 + 2.7 * 1.5)).abs() < 1e-4);
        assert!((totals.carbs_g - 28.0 * 1.5).abs() < 1e-4);
        assert!((totals.calories - (165.0 * 2.0 + 130.0 * 1.5)).abs() < 1e-3);
    }

    #[test]
    fn test_value_of_covers_all_axes() {
        let profile = NutrientProfile::new(100.0, 10.0, 20.0, 5.0);
        assert_eq!(profile.value_of(MacroAxis::Calories), 100.0);
        assert_eq!(profile.value_of(MacroAxis::Protein), 10.0);
        assert_eq!(profile.value_of(MacroAxis::Carbs), 20.0);
        assert_eq!(profile.value_of(MacroAxis::Fat), 5.0);
    }
}
