//! Ingestion of recipe-concept drafts.
//!
//! An upstream generator (an LLM workflow) produces a draft meal as JSON:
//! a name, an ingredient list with free-text amounts, and instructions.
//! The draft becomes the optimizer's input ingredient list; a malformed or
//! missing draft is the caller's concern, so nothing here validates or
//! retries the collaborator.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ingredient::Ingredient;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DraftIngredient {
    pub name: String,
    #[serde(alias = "amount")]
    pub amount_str: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MealDraft {
    #[serde(alias = "name")]
    pub meal_name: String,
    pub ingredients: Vec<DraftIngredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl MealDraft {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to deserialize meal draft")
    }

    /// Converts the draft lines into optimizer inputs. Amount strings are
    /// parsed to grams and each name is categorized exactly once.
    pub fn to_ingredients(&self) -> Vec<Ingredient> {
        self.ingredients
            .iter()
            .map(|line| Ingredient::from_amount_str(&line.name, &line.amount_str))
            .collect()
    }
}
