//! Convergence checks and caller-facing accuracy reporting.
//!
//! Two deliberately separate knobs: the numeric `tolerance` drives the
//! optimizer's stop/retry (gap-fill) decision, while the fixed ±5% status
//! threshold only labels each macro for display. A tight solver tolerance
//! with a "Needs adjustment" label, or the reverse, are both valid states.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::nutrition::{MacroAxis, NutrientProfile};
use crate::optim::optimizer::target_value;
use crate::optim::targets::TargetMacros;

/// UI-facing label threshold in percent, independent of the solver
/// tolerance.
const STATUS_THRESHOLD_PCT: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviationStatus {
    Good,
    NeedsAdjustment,
}

impl fmt::Display for DeviationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviationStatus::Good => write!(f, "Good"),
            DeviationStatus::NeedsAdjustment => write!(f, "Needs adjustment"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacroDeviation {
    pub target: f32,
    pub actual: f32,
    pub deviation_pct: f32,
    pub status: DeviationStatus,
}

/// Per-macro accuracy of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviationReport {
    pub calories: MacroDeviation,
    pub protein: MacroDeviation,
    pub carbs: MacroDeviation,
    pub fat: MacroDeviation,
}

impl DeviationReport {
    pub fn get(&self, axis: MacroAxis) -> &MacroDeviation {
        match axis {
            MacroAxis::Calories => &self.calories,
            MacroAxis::Protein => &self.protein,
            MacroAxis::Carbs => &self.carbs,
            MacroAxis::Fat => &self.fat,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MacroAxis, &MacroDeviation)> {
        MacroAxis::ALL.iter().map(move |&axis| (axis, self.get(axis)))
    }
}

/// Fractional deviation of one macro, or 0 for a zero target: a zero
/// target cannot be divided by and is trivially satisfied.
fn fraction(actual: f32, target: f32) -> f32 {
    if target == 0.0 {
        0.0
    } else {
        (actual - target) / target
    }
}

/// Whether every targeted macro landed within `tolerance` (fractional,
/// e.g. 0.05 for ±5%). Macros with a zero target pass trivially.
pub fn within_tolerance(achieved: &NutrientProfile, target: &TargetMacros, tolerance: f32) -> bool {
    MacroAxis::ALL.iter().all(|&axis| {
        fraction(achieved.value_of(axis), target_value(target, axis)).abs() <= tolerance
    })
}

/// Builds the per-macro accuracy report surfaced to the caller.
pub fn deviation_report(achieved: &NutrientProfile, target: &TargetMacros) -> DeviationReport {
    let entry = |axis: MacroAxis| {
        let target_v = target_value(target, axis);
        let actual = achieved.value_of(axis);
        let deviation_pct = fraction(actual, target_v) * 100.0;
        MacroDeviation {
            target: target_v,
            actual,
            deviation_pct,
            status: if deviation_pct.abs() <= STATUS_THRESHOLD_PCT {
                DeviationStatus::Good
            } else {
                DeviationStatus::NeedsAdjustment
            },
        }
    };

    DeviationReport {
        calories: entry(MacroAxis::Calories),
        protein: entry(MacroAxis::Protein),
        carbs: entry(MacroAxis::Carbs),
        fat: entry(MacroAxis::Fat),
    }
}
