use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Caller-supplied macro targets for one optimization run. Immutable
/// input; all values are absolute (grams / kcal), not per-100g.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetMacros {
    pub calories: f32,
    pub protein_g: f32,
    pub carbs_g: f32,
    pub fat_g: f32,
}

/// Input-contract violation: a malformed target is rejected before any
/// optimization is attempted, never silently clamped.
#[derive(Debug, PartialEq)]
pub enum TargetError {
    Negative { field: &'static str, value: f32 },
    NotFinite { field: &'static str },
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetError::Negative { field, value } => {
                write!(f, "target {} must be >= 0, got {}", field, value)
            }
            TargetError::NotFinite { field } => {
                write!(f, "target {} must be a finite number", field)
            }
        }
    }
}

impl Error for TargetError {}

impl TargetMacros {
    pub fn new(calories: f32, protein_g: f32, carbs_g: f32, fat_g: f32) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    pub fn validate(&self) -> Result<(), TargetError> {
        for (field, value) in [
            ("calories", self.calories),
            ("protein_g", self.protein_g),
            ("carbs_g", self.carbs_g),
            ("fat_g", self.fat_g),
        ] {
            if !value.is_finite() {
                return Err(TargetError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(TargetError::Negative { field, value });
            }
        }
        Ok(())
    }
}
