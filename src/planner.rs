//! Top-level meal optimization workflow.
//!
//! One call: validate the target, resolve every ingredient's per-100g
//! profile, solve portions, check tolerance, gap-fill once if short, and
//! re-solve on the augmented list. Data-availability problems degrade to
//! defaults along the way; only input-contract violations (malformed
//! target, empty ingredient list) surface as errors.

use anyhow::{bail, Result};
use log::{debug, info};

use crate::amount::format_amount;
use crate::ingredient::Ingredient;
use crate::lookup::NutritionLookup;
use crate::nutrition::NutrientProfile;
use crate::optim::gap_fill::{DietaryConstraint, GapFillAdvisor, GapFillConfig};
use crate::optim::optimizer::{OptimizerConfig, PortionOptimizer};
use crate::optim::targets::TargetMacros;
use crate::optim::tolerance::{deviation_report, within_tolerance, DeviationReport};

pub const DEFAULT_TOLERANCE: f32 = 0.05;

/// Outcome of one optimization run. Not persisted here; storage is the
/// caller's concern.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub ingredients: Vec<Ingredient>,
    pub achieved: NutrientProfile,
    pub report: DeviationReport,
    /// Whether the final meal landed within the requested tolerance on
    /// every targeted macro.
    pub converged: bool,
    /// Names appended by gap-fill, in addition order.
    pub added_by_gap_fill: Vec<String>,
}

pub struct MealPlanner {
    optimizer: PortionOptimizer,
    advisor: GapFillAdvisor,
    lookup: NutritionLookup,
}

impl MealPlanner {
    pub fn new(lookup: NutritionLookup) -> Self {
        Self::with_configs(lookup, OptimizerConfig::default(), GapFillConfig::default())
    }

    pub fn with_configs(
        lookup: NutritionLookup,
        optimizer_config: OptimizerConfig,
        gap_fill_config: GapFillConfig,
    ) -> Self {
        Self {
            optimizer: PortionOptimizer::new(optimizer_config),
            advisor: GapFillAdvisor::new(gap_fill_config),
            lookup,
        }
    }

    pub fn lookup(&self) -> &NutritionLookup {
        &self.lookup
    }

    /// Optimizes portions for a meal toward `target`.
    ///
    /// Ingredients are only ever added (by gap-fill), never removed, and
    /// every returned amount is positive and inside its portion bound.
    ///
    /// # Errors
    /// Fails fast on a malformed target or an empty ingredient list; all
    /// other failure modes are absorbed and show up only as a lower
    /// reported accuracy.
    pub fn optimize_meal(
        &self,
        mut ingredients: Vec<Ingredient>,
        target: &TargetMacros,
        constraint: &DietaryConstraint,
        tolerance: f32,
    ) -> Result<OptimizationResult> {
        target.validate()?;
        if ingredients.is_empty() {
            bail!("at least one ingredient is required");
        }

        let mut profiles = self.resolve_profiles(&ingredients);
        let mut outcome = self.optimizer.optimize(&mut ingredients, &profiles, target);
        debug!(
            "initial solve: converged={} sweeps={} achieved p={:.1} c={:.1} f={:.1} kcal={:.0}",
            outcome.converged,
            outcome.sweeps,
            outcome.achieved.protein_g,
            outcome.achieved.carbs_g,
            outcome.achieved.fat_g,
            outcome.achieved.calories
        );

        let mut added_by_gap_fill = Vec::new();
        if !within_tolerance(&outcome.achieved, target, tolerance) {
            let additions = self
                .advisor
                .fill_gaps(&outcome.achieved, target, constraint, &self.lookup);

            if !additions.is_empty() {
                added_by_gap_fill = additions.iter().map(|i| i.name.clone()).collect();
                ingredients.extend(additions);
                profiles = self.resolve_profiles(&ingredients);
                outcome = self.optimizer.optimize(&mut ingredients, &profiles, target);
            }
        }

        for ingredient in ingredients.iter_mut() {
            ingredient.display_amount = format_amount(ingredient.amount_g, &ingredient.name);
        }

        let converged = within_tolerance(&outcome.achieved, target, tolerance);
        let report = deviation_report(&outcome.achieved, target);
        info!(
            "meal optimized: {} ingredients ({} gap-filled), within tolerance: {}",
            ingredients.len(),
            added_by_gap_fill.len(),
            converged
        );

        Ok(OptimizationResult {
            ingredients,
            achieved: outcome.achieved,
            report,
            converged,
            added_by_gap_fill,
        })
    }

    fn resolve_profiles(&self, ingredients: &[Ingredient]) -> Vec<NutrientProfile> {
        ingredients
            .iter()
            .map(|i| self.lookup.get(&i.name, i.category))
            .collect()
    }
}
