//! Wire types for the USDA FoodData Central API, the external nutrition
//! source. Only the fields this system reads are modeled; everything else
//! in the responses is ignored.

use serde::{Deserialize, Serialize};

use crate::nutrition::NutrientProfile;

pub const FDC_API_BASE: &str = "https://api.nal.usda.gov/fdc/v1";

// FDC nutrient numbers for the macros extracted from responses.
pub const NUTRIENT_NUMBER_PROTEIN: &str = "203";
pub const NUTRIENT_NUMBER_FAT: &str = "204";
pub const NUTRIENT_NUMBER_CARBS: &str = "205";
pub const NUTRIENT_NUMBER_ENERGY: &str = "208";
pub const NUTRIENT_NUMBER_FIBER: &str = "291";

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearchRequest {
    pub query: String,
    pub page_size: u32,
    pub data_type: Vec<String>,
}

impl FoodSearchRequest {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            page_size: 5,
            data_type: vec!["Foundation".to_string(), "SR Legacy".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FoodSearchResponse {
    #[serde(default)]
    pub foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchFood {
    pub fdc_id: u64,
    pub description: String,
    #[serde(default)]
    pub food_nutrients: Vec<SearchNutrient>,
}

/// Search responses carry nutrients flat, with per-100g values.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchNutrient {
    pub nutrient_number: Option<String>,
    pub value: Option<f32>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetailsResponse {
    pub description: String,
    #[serde(default)]
    pub food_nutrients: Vec<DetailNutrient>,
}

/// Details responses nest the nutrient reference under each amount.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DetailNutrient {
    pub nutrient: NutrientRef,
    pub amount: Option<f32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NutrientRef {
    pub number: Option<String>,
}

fn profile_from_numbers<'a>(
    nutrients: impl Iterator<Item = (Option<&'a str>, Option<f32>)>,
) -> Option<NutrientProfile> {
    let mut profile = NutrientProfile::default();
    let mut found_any = false;

    for (number, value) in nutrients {
        let (Some(number), Some(value)) = (number, value) else {
            continue;
        };
        let slot = match number {
            NUTRIENT_NUMBER_ENERGY => &mut profile.calories,
            NUTRIENT_NUMBER_PROTEIN => &mut profile.protein_g,
            NUTRIENT_NUMBER_FAT => &mut profile.fat_g,
            NUTRIENT_NUMBER_CARBS => &mut profile.carbs_g,
            NUTRIENT_NUMBER_FIBER => &mut profile.fiber_g,
            _ => continue,
        };
        *slot = value.max(0.0);
        found_any = true;
    }

    found_any.then_some(profile)
}

impl SearchFood {
    /// Extracts a per-100g profile, or `None` when the record carries no
    /// recognized macro at all.
    pub fn to_profile(&self) -> Option<NutrientProfile> {
        profile_from_numbers(
            self.food_nutrients
                .iter()
                .map(|n| (n.nutrient_number.as_deref(), n.value)),
        )
    }
}

impl FoodDetailsResponse {
    pub fn to_profile(&self) -> Option<NutrientProfile> {
        profile_from_numbers(
            self.food_nutrients
                .iter()
                .map(|n| (n.nutrient.number.as_deref(), n.amount)),
        )
    }
}
