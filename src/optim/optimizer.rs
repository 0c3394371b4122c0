//! Bounded weighted least-squares assignment of gram amounts.
//!
//! The objective over the amount vector `a` is
//!
//! ```text
//! error(a) = w_p * (protein(a) - target.protein)^2
//!          + w_c * (carbs(a)   - target.carbs)^2
//!          + w_f * (fat(a)     - target.fat)^2
//!          + w_k * (calories(a)- target.calories)^2 * scale_k
//! ```
//!
//! with `protein(a) = Σ a_i/100 * profile_i.protein_g` and so on. This is
//! a convex quadratic with box constraints, solved by cyclic coordinate
//! descent: each ingredient's exact one-dimensional minimum is computed in
//! closed form and clamped into its portion bound, sweeping until the
//! largest amount change falls below the convergence threshold.

use log::warn;

use crate::ingredient::Ingredient;
use crate::nutrition::{meal_totals, MacroAxis, NutrientProfile};
use crate::optim::targets::TargetMacros;

/// Objective weights and solver limits. The weights are meal-planning
/// heuristics, not physical constants: protein is weighted highest because
/// under-shooting protein is the most common failure mode of naive meal
/// construction, and the calorie term is down-scaled because its absolute
/// magnitude would otherwise dominate the objective. Retuning is fine as
/// long as the protein > carbs/fat > calories priority ordering holds.
#[derive(Debug, Clone, Copy)]
pub struct OptimizerConfig {
    pub protein_weight: f32,
    pub carb_weight: f32,
    pub fat_weight: f32,
    pub calorie_weight: f32,
    pub calorie_scale: f32,
    pub max_sweeps: usize,
    /// Sweep-to-sweep amount change (grams) below which the solve is
    /// considered converged.
    pub convergence_delta_g: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            protein_weight: 2.0,
            carb_weight: 1.5,
            fat_weight: 1.5,
            calorie_weight: 1.0,
            calorie_scale: 0.01,
            max_sweeps: 100,
            convergence_delta_g: 0.01,
        }
    }
}

impl OptimizerConfig {
    fn weight_of(&self, axis: MacroAxis) -> f32 {
        match axis {
            MacroAxis::Protein => self.protein_weight,
            MacroAxis::Carbs => self.carb_weight,
            MacroAxis::Fat => self.fat_weight,
            MacroAxis::Calories => self.calorie_weight * self.calorie_scale,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Totals over the returned (rounded) amounts.
    pub achieved: NutrientProfile,
    pub converged: bool,
    pub sweeps: usize,
}

/// Minimum initial guess in grams. The solver is local; starting a
/// near-zero portion at a plausible amount avoids poor local behavior of
/// the first sweeps.
const MIN_INITIAL_GUESS_G: f32 = 10.0;

#[derive(Debug, Default)]
pub struct PortionOptimizer {
    config: OptimizerConfig,
}

impl PortionOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Weighted squared error of `achieved` against `target`.
    pub fn objective(&self, achieved: &NutrientProfile, target: &TargetMacros) -> f32 {
        MacroAxis::ALL
            .iter()
            .map(|&axis| {
                let diff = achieved.value_of(axis) - target_value(target, axis);
                self.config.weight_of(axis) * diff * diff
            })
            .sum()
    }

    /// Adjusts `ingredients` in place to minimize the weighted deviation
    /// from `target`. `profiles` must be index-aligned with `ingredients`.
    ///
    /// Portion optimization is a best-effort refinement: on
    /// non-convergence or a non-finite iterate the original amounts are
    /// restored and reported with `converged: false` instead of an error,
    /// so the caller always receives a usable ingredient list.
    pub fn optimize(
        &self,
        ingredients: &mut [Ingredient],
        profiles: &[NutrientProfile],
        target: &TargetMacros,
    ) -> SolveOutcome {
        assert_eq!(ingredients.len(), profiles.len());
        if ingredients.is_empty() {
            return SolveOutcome {
                achieved: NutrientProfile::default(),
                converged: true,
                sweeps: 0,
            };
        }

        let original: Vec<f32> = ingredients.iter().map(|i| i.amount_g).collect();

        // Per-gram macro coefficients, one row per axis.
        let coeffs: Vec<[f32; 4]> = profiles
            .iter()
            .map(|p| {
                [
                    p.value_of(MacroAxis::ALL[0]) / 100.0,
                    p.value_of(MacroAxis::ALL[1]) / 100.0,
                    p.value_of(MacroAxis::ALL[2]) / 100.0,
                    p.value_of(MacroAxis::ALL[3]) / 100.0,
                ]
            })
            .collect();
        let weights: [f32; 4] = [
            self.config.weight_of(MacroAxis::ALL[0]),
            self.config.weight_of(MacroAxis::ALL[1]),
            self.config.weight_of(MacroAxis::ALL[2]),
            self.config.weight_of(MacroAxis::ALL[3]),
        ];
        let targets: [f32; 4] = [
            target_value(target, MacroAxis::ALL[0]),
            target_value(target, MacroAxis::ALL[1]),
            target_value(target, MacroAxis::ALL[2]),
            target_value(target, MacroAxis::ALL[3]),
        ];

        let mut amounts: Vec<f32> = ingredients
            .iter()
            .map(|i| i.bounds.clamp(i.amount_g.max(MIN_INITIAL_GUESS_G)))
            .collect();

        // Running totals per axis, updated incrementally per coordinate.
        let mut achieved = [0.0f32; 4];
        for (a, c) in amounts.iter().zip(coeffs.iter()) {
            for m in 0..4 {
                achieved[m] += c[m] * a;
            }
        }

        let mut converged = false;
        let mut sweeps = 0;
        'solve: for sweep in 1..=self.config.max_sweeps {
            sweeps = sweep;
            let mut max_delta = 0.0f32;

            for i in 0..amounts.len() {
                let c = &coeffs[i];
                let mut numer = 0.0f32;
                let mut denom = 0.0f32;
                for m in 0..4 {
                    let residual = targets[m] - (achieved[m] - c[m] * amounts[i]);
                    numer += weights[m] * c[m] * residual;
                    denom += weights[m] * c[m] * c[m];
                }
                if denom <= f32::EPSILON {
                    // Profile contributes nothing to any axis; leave it.
                    continue;
                }

                let candidate = ingredients[i].bounds.clamp(numer / denom);
                if !candidate.is_finite() {
                    warn!("portion solve produced a non-finite amount, keeping original portions");
                    break 'solve;
                }

                let delta = (candidate - amounts[i]).abs();
                if delta > 0.0 {
                    for m in 0..4 {
                        achieved[m] += c[m] * (candidate - amounts[i]);
                    }
                    amounts[i] = candidate;
                    max_delta = max_delta.max(delta);
                }
            }

            if max_delta < self.config.convergence_delta_g {
                converged = true;
                break;
            }
        }

        if converged {
            for (ingredient, amount) in ingredients.iter_mut().zip(amounts.iter()) {
                ingredient.amount_g = (amount * 10.0).round() / 10.0;
            }
        } else {
            warn!(
                "portion solve did not converge within {} sweeps, keeping original portions",
                self.config.max_sweeps
            );
            for (ingredient, amount) in ingredients.iter_mut().zip(original.iter()) {
                ingredient.amount_g = *amount;
            }
        }

        SolveOutcome {
            achieved: meal_totals(ingredients, profiles),
            converged,
            sweeps,
        }
    }
}

pub(crate) fn target_value(target: &TargetMacros, axis: MacroAxis) -> f32 {
    match axis {
        MacroAxis::Calories => target.calories,
        MacroAxis::Protein => target.protein_g,
        MacroAxis::Carbs => target.carbs_g,
        MacroAxis::Fat => target.fat_g,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicken_profile() -> NutrientProfile {
        NutrientProfile::new(165.0, 31.0, 0.0, 3.6)
    }

    #[test]
    fn test_single_ingredient_scales_to_protein_target() {
        let optimizer = PortionOptimizer::default();
        let mut ingredients = vec![Ingredient::new("chicken breast", 100.0)];
        let profiles = vec![chicken_profile()];
        let target = TargetMacros::new(200.0, 40.0, 0.0, 5.0);

        let outcome = optimizer.optimize(&mut ingredients, &profiles, &target);
        assert!(outcome.converged);
        // Protein dominates the objective: ~129 g lands 40 g of protein.
        assert!(
            (ingredients[0].amount_g - 129.0).abs() < 3.0,
            "got {} g",
            ingredients[0].amount_g
        );
        assert!((outcome.achieved.protein_g - 40.0).abs() < 1.0);
    }

    #[test]
    fn test_amounts_stay_within_bounds() {
        let optimizer = PortionOptimizer::default();
        // A huge fat target pushes the solver into the oil's upper bound.
        let mut ingredients = vec![Ingredient::new("olive oil", 10.0)];
        let profiles = vec![NutrientProfile::new(884.0, 0.0, 0.0, 100.0)];
        let target = TargetMacros::new(900.0, 0.0, 0.0, 100.0);

        let outcome = optimizer.optimize(&mut ingredients, &profiles, &target);
        assert!(outcome.converged);
        assert_eq!(ingredients[0].amount_g, 30.0);
    }

    #[test]
    fn test_objective_never_worse_than_initial_guess() {
        let optimizer = PortionOptimizer::default();
        let mut ingredients = vec![
            Ingredient::new("chicken breast", 50.0),
            Ingredient::new("white rice", 300.0),
            Ingredient::new("olive oil", 20.0),
        ];
        let profiles = vec![
            chicken_profile(),
            NutrientProfile::new(130.0, 2.7, 28.0, 0.3),
            NutrientProfile::new(884.0, 0.0, 0.0, 100.0),
        ];
        let target = TargetMacros::new(600.0, 45.0, 60.0, 15.0);

        let initial_totals = meal_totals(&ingredients, &profiles);
        let initial_error = optimizer.objective(&initial_totals, &target);

        let outcome = optimizer.optimize(&mut ingredients, &profiles, &target);
        let final_error = optimizer.objective(&outcome.achieved, &target);

        assert!(outcome.converged);
        assert!(final_error <= initial_error + 1e-3);
    }

    #[test]
    fn test_zero_profile_ingredient_is_left_alone() {
        let optimizer = PortionOptimizer::default();
        let mut ingredients = vec![
            Ingredient::new("chicken breast", 100.0),
            Ingredient::new("water", 250.0),
        ];
        let profiles = vec![chicken_profile(), NutrientProfile::default()];
        let target = TargetMacros::new(300.0, 50.0, 0.0, 8.0);

        let outcome = optimizer.optimize(&mut ingredients, &profiles, &target);
        assert!(outcome.converged);
        assert_eq!(ingredients[1].amount_g, 250.0);
    }

    #[test]
    fn test_initial_guess_floor_applies() {
        let optimizer = PortionOptimizer::default();
        // 1 g of rice would start the solve at the floor, not at 1 g.
        let mut ingredients = vec![Ingredient::new("white rice", 1.0)];
        let profiles = vec![NutrientProfile::new(130.0, 2.7, 28.0, 0.3)];
        let target = TargetMacros::new(260.0, 5.4, 56.0, 0.6);

        let outcome = optimizer.optimize(&mut ingredients, &profiles, &target);
        assert!(outcome.converged);
        assert!((ingredients[0].amount_g - 200.0).abs() < 5.0);
    }

    #[test]
    fn test_achieved_matches_returned_amounts() {
        let optimizer = PortionOptimizer::default();
        let mut ingredients = vec![
            Ingredient::new("chicken breast", 120.0),
            Ingredient::new("sweet potato", 150.0),
        ];
        let profiles = vec![chicken_profile(), NutrientProfile::new(86.0, 1.6, 20.1, 0.1)];
        let target = TargetMacros::new(500.0, 40.0, 40.0, 8.0);

        let outcome = optimizer.optimize(&mut ingredients, &profiles, &target);
        let recomputed = meal_totals(&ingredients, &profiles);
        assert!((outcome.achieved.protein_g - recomputed.protein_g).abs() < 0.1);
        assert!((outcome.achieved.calories - recomputed.calories).abs() < 0.1);
    }

    #[test]
    fn test_zero_sweep_cap_falls_back_to_original_amounts() {
        let optimizer = PortionOptimizer::new(OptimizerConfig {
            max_sweeps: 0,
            ..OptimizerConfig::default()
        });
        let mut ingredients = vec![Ingredient::new("chicken breast", 77.0)];
        let profiles = vec![chicken_profile()];
        let target = TargetMacros::new(200.0, 40.0, 0.0, 5.0);

        let outcome = optimizer.optimize(&mut ingredients, &profiles, &target);
        assert!(!outcome.converged);
        assert_eq!(ingredients[0].amount_g, 77.0);
    }
}
