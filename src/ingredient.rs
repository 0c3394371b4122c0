use serde::{Deserialize, Serialize};

use crate::amount::parse_amount;

/// Macro category of a food, decided once when the ingredient is
/// constructed. Drives the category-default nutrition profile and
/// gap-fill eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Protein,
    Carb,
    Fat,
    Vegetable,
    Fruit,
    Other,
}

const PROTEIN_TOKENS: &[&str] = &[
    "chicken", "turkey", "beef", "pork", "fish", "salmon", "tuna", "shrimp", "egg", "tofu",
    "tempeh", "yogurt", "cottage", "whey", "protein", "lentil", "bean",
];
const FAT_TOKENS: &[&str] = &[
    "oil", "butter", "avocado", "almond", "peanut", "walnut", "cashew", "seed", "tahini", "nut",
];
const CARB_TOKENS: &[&str] = &[
    "rice", "oat", "bread", "pasta", "potato", "quinoa", "tortilla", "cereal", "flour", "sugar",
    "honey", "couscous", "noodle",
];
const VEGETABLE_TOKENS: &[&str] = &[
    "spinach", "broccoli", "kale", "lettuce", "pepper", "tomato", "cucumber", "carrot",
    "zucchini", "cauliflower", "asparagus", "mushroom", "onion", "vegetable",
];
const FRUIT_TOKENS: &[&str] = &[
    "apple", "banana", "berry", "berries", "orange", "grape", "mango", "pineapple", "melon",
    "peach", "pear", "fruit",
];

impl Category {
    /// Classifies a free-text ingredient name by keyword. Fat tokens are
    /// checked before protein tokens so that "peanut butter" lands in fat
    /// rather than falling through on "butter"-adjacent protein names.
    pub fn classify(name: &str) -> Category {
        let lower = name.to_lowercase();
        let contains_any = |tokens: &[&str]| tokens.iter().any(|t| lower.contains(t));

        if contains_any(FAT_TOKENS) {
            Category::Fat
        } else if contains_any(PROTEIN_TOKENS) {
            Category::Protein
        } else if contains_any(CARB_TOKENS) {
            Category::Carb
        } else if contains_any(VEGETABLE_TOKENS) {
            Category::Vegetable
        } else if contains_any(FRUIT_TOKENS) {
            Category::Fruit
        } else {
            Category::Other
        }
    }
}

/// Gram bounds the optimizer may assign to one ingredient. Uniform bounds
/// let the solver assign absurd amounts to seasonings or oils, so the
/// bound is name-dependent and fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortionBounds {
    pub min_g: f32,
    pub max_g: f32,
}

impl PortionBounds {
    pub const OIL: PortionBounds = PortionBounds { min_g: 1.0, max_g: 30.0 };
    pub const SEASONING: PortionBounds = PortionBounds { min_g: 0.5, max_g: 5.0 };
    pub const PROTEIN_POWDER: PortionBounds = PortionBounds { min_g: 10.0, max_g: 50.0 };
    pub const STANDARD: PortionBounds = PortionBounds { min_g: 10.0, max_g: 500.0 };

    pub fn for_name(name: &str) -> PortionBounds {
        let lower = name.to_lowercase();
        if lower.contains("oil") || lower.contains("butter") {
            PortionBounds::OIL
        } else if lower.contains("salt")
            || lower.contains("pepper")
            || lower.contains("spice")
            || lower.contains("seasoning")
        {
            PortionBounds::SEASONING
        } else if lower.contains("protein powder")
            || lower.contains("whey")
            || lower.contains("casein")
        {
            PortionBounds::PROTEIN_POWDER
        } else {
            PortionBounds::STANDARD
        }
    }

    pub fn clamp(&self, grams: f32) -> f32 {
        grams.clamp(self.min_g, self.max_g)
    }

    pub fn contains(&self, grams: f32) -> bool {
        grams >= self.min_g && grams <= self.max_g
    }
}

/// A named food reference with its current gram amount. Category and
/// portion bounds are derived from the name exactly once, here; the rest
/// of the pipeline works in grams and enum tags only.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Ingredient {
    pub name: String,
    pub amount_g: f32,
    /// Human-readable rendering of `amount_g`, refreshed by the planner
    /// after optimization. Never an input to computation.
    pub display_amount: String,
    pub category: Category,
    pub bounds: PortionBounds,
}

impl Ingredient {
    pub fn new(name: &str, amount_g: f32) -> Self {
        Self {
            name: name.to_string(),
            amount_g,
            display_amount: format!("{:.0} g", amount_g),
            category: Category::classify(name),
            bounds: PortionBounds::for_name(name),
        }
    }

    /// Builds an ingredient from a free-text amount, e.g. a draft line
    /// `("olive oil", "1 tbsp")`.
    pub fn from_amount_str(name: &str, amount_str: &str) -> Self {
        let grams = parse_amount(amount_str, name);
        let mut ingredient = Ingredient::new(name, grams);
        ingredient.display_amount = amount_str.trim().to_string();
        ingredient
    }
}
