//! Ingredient-name → per-100g profile resolution.
//!
//! Resolution order: curated booster table (exact, case-insensitive) →
//! persistent cache → common-foods fallback table (substring) → category
//! default. The chain never fails: absent data degrades to the category
//! default so the optimizer always has a profile to work with.

pub mod cache;
pub mod food_table;

use log::debug;

use crate::ingredient::Category;
use crate::nutrition::{MacroAxis, NutrientProfile};
use cache::ProfileStore;
use food_table::{category_default, BoosterFood, FoodRecord, BOOSTERS, COMMON_FOODS};

pub struct NutritionLookup {
    store: Box<dyn ProfileStore>,
    /// User-supplied records consulted before the built-in fallback table.
    extra_foods: Vec<FoodRecord>,
}

impl NutritionLookup {
    pub fn new(store: Box<dyn ProfileStore>) -> Self {
        Self {
            store,
            extra_foods: Vec::new(),
        }
    }

    /// Adds records (e.g. from a CSV food table) that take precedence over
    /// the built-in fallback table.
    pub fn extend_food_table(&mut self, records: Vec<FoodRecord>) {
        self.extra_foods.extend(records);
    }

    /// Writes a profile straight into the cache, e.g. after a food-database
    /// pre-fetch. Subsequent `get` calls for the name hit the cache before
    /// any fallback guessing.
    pub fn warm(&self, name: &str, profile: &NutrientProfile) {
        self.store.set(name, profile);
    }

    /// Resolves an ingredient name to its per-100g profile. Infallible:
    /// the worst case is the declared category's default profile.
    pub fn get(&self, name: &str, category: Category) -> NutrientProfile {
        let lower = name.trim().to_lowercase();

        if let Some(booster) = BOOSTERS.iter().find(|b| b.name == lower) {
            debug!("lookup '{}': booster table hit", name);
            if self.store.get(&lower).is_none() {
                self.store.set(&lower, &booster.profile);
            }
            return booster.profile;
        }

        if let Some(profile) = self.store.get(&lower) {
            debug!("lookup '{}': cache hit", name);
            return profile;
        }

        if let Some(record) = self.match_fallback(&lower) {
            debug!("lookup '{}': fallback table match '{}'", name, record.name);
            let profile = record.profile;
            self.store.set(&lower, &profile);
            return profile;
        }

        // LookupMiss: degrade to the category default. Deliberately not
        // cached, so a later cache warm can supersede the guess.
        debug!("lookup '{}': no match, using {:?} default", name, category);
        category_default(category)
    }

    /// Whether a name would resolve from real data (booster, cache or
    /// fallback table) rather than a category default. Lets callers
    /// decide which ingredients are worth a food-database pre-fetch.
    pub fn has_data(&self, name: &str) -> bool {
        let lower = name.trim().to_lowercase();
        BOOSTERS.iter().any(|b| b.name == lower)
            || self.store.get(&lower).is_some()
            || self.match_fallback(&lower).is_some()
    }

    /// Substring match, user-supplied records before the built-in table.
    /// Of all records whose name overlaps the query (either direction),
    /// the longest record name wins as the most specific.
    fn match_fallback(&self, lower: &str) -> Option<&FoodRecord> {
        best_match(&self.extra_foods, lower).or_else(|| best_match(&COMMON_FOODS, lower))
    }

    /// Booster candidates dense in the given macro.
    pub fn booster_pool(&self, axis: MacroAxis) -> Vec<&BoosterFood> {
        BOOSTERS.iter().filter(|b| b.pool == axis).collect()
    }
}

fn best_match<'a>(records: &'a [FoodRecord], lower: &str) -> Option<&'a FoodRecord> {
    records
        .iter()
        .filter(|record| {
            let key = record.name.to_lowercase();
            lower.contains(&key) || key.contains(lower)
        })
        .max_by_key(|record| record.name.len())
}
