//! Free-text portion strings to grams and back.
//!
//! This is deliberately not a unit-algebra parser: the first numeric token
//! is extracted, then the remainder is matched by ordered substring rules.
//! Ambiguous strings like "2 large eggs" must hit the egg-specific rule
//! before the generic "large" rule, so rule order is part of the contract.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// First numeric token, with optional simple fraction ("1/2", "1 / 2").
    static ref QUANTITY_RE: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)(?:\s*/\s*(\d+(?:\.\d+)?))?").expect("quantity pattern is valid");
}

/// Grams assumed when an amount string carries no numeric token at all
/// ("a pinch", "to taste").
const DEFAULT_GRAMS: f32 = 100.0;

const GRAMS_PER_EGG: f32 = 50.0;
const GRAMS_PER_TBSP: f32 = 15.0;

/// Converts a free-text amount like "1 cup", "2 tbsp" or "150g" to grams.
///
/// The ingredient name disambiguates count-based units: "2 large" means
/// ~50 g apiece for eggs, ~150 g for a medium apple or banana, ~100 g for
/// other medium produce. Volume units assume density ≈ 1 where needed.
pub fn parse_amount(amount_str: &str, ingredient_name: &str) -> f32 {
    let text = amount_str.to_lowercase();
    let name = ingredient_name.to_lowercase();

    let quantity = match QUANTITY_RE.captures(&text) {
        Some(caps) => {
            let whole: f32 = caps[1].parse().unwrap_or(1.0);
            match caps.get(2).and_then(|d| d.as_str().parse::<f32>().ok()) {
                Some(denom) if denom > 0.0 => whole / denom,
                _ => whole,
            }
        }
        None => return DEFAULT_GRAMS,
    };

    let grams_per_unit = if text.contains("kg") || text.contains("kilogram") {
        1000.0
    } else if text.contains("lb") || text.contains("pound") {
        453.592
    } else if text.contains("oz") || text.contains("ounce") {
        28.3495
    } else if text.contains("ml") || text.contains("milliliter") {
        1.0
    } else if text.contains("cup") {
        240.0
    } else if text.contains("tbsp") || text.contains("tablespoon") {
        GRAMS_PER_TBSP
    } else if text.contains("tsp") || text.contains("teaspoon") {
        5.0
    } else if text.contains("large") && name.contains("egg") {
        GRAMS_PER_EGG
    } else if text.contains("medium") && (name.contains("apple") || name.contains("banana")) {
        150.0
    } else if text.contains("medium") {
        100.0
    } else if text.contains("small") {
        75.0
    } else {
        // "g", "gram" or bare number.
        1.0
    };

    quantity * grams_per_unit
}

/// Renders grams back into the ingredient's natural display unit.
///
/// Presentation only: the returned string must never feed back into a
/// computation; all arithmetic stays in grams.
pub fn format_amount(grams: f32, ingredient_name: &str) -> String {
    let name = ingredient_name.to_lowercase();

    if name.contains("egg") && grams >= 40.0 {
        let count = (grams / GRAMS_PER_EGG).round().max(1.0);
        return format!("{:.0} large", count);
    }
    if (name.contains("oil") || name.contains("butter")) && grams <= 30.0 {
        return format!("{:.1} tbsp", grams / GRAMS_PER_TBSP);
    }
    if grams >= 1000.0 {
        return format!("{:.2} kg", grams / 1000.0);
    }
    format!("{:.0} g", grams)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metric_units() {
        assert_eq!(parse_amount("150g", "chicken breast"), 150.0);
        assert_eq!(parse_amount("150 grams", "chicken breast"), 150.0);
        assert_eq!(parse_amount("1.5 kg", "potatoes"), 1500.0);
        assert_eq!(parse_amount("200 ml", "milk"), 200.0);
    }

    #[test]
    fn test_parse_imperial_units() {
        assert!((parse_amount("1 lb", "ground beef") - 453.592).abs() < 1e-3);
        assert!((parse_amount("2 oz", "cheddar") - 56.699).abs() < 1e-3);
    }

    #[test]
    fn test_parse_volume_units() {
        assert_eq!(parse_amount("1 cup", "white rice"), 240.0);
        assert_eq!(parse_amount("1 tbsp", "olive oil"), 15.0);
        assert_eq!(parse_amount("2 tablespoons", "olive oil"), 30.0);
        assert_eq!(parse_amount("1 tsp", "salt"), 5.0);
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_amount("1/2 cup", "oats"), 120.0);
    }

    #[test]
    fn test_parse_count_units_prefer_specific_rule() {
        // "large" + egg must win over the generic "large" branch.
        assert_eq!(parse_amount("2 large", "eggs"), 100.0);
        assert_eq!(parse_amount("1 medium", "apple"), 150.0);
        assert_eq!(parse_amount("1 medium", "sweet potato"), 100.0);
        assert_eq!(parse_amount("2 small", "carrots"), 150.0);
    }

    #[test]
    fn test_parse_no_numeric_token_defaults() {
        assert_eq!(parse_amount("a pinch", "salt"), DEFAULT_GRAMS);
        assert_eq!(parse_amount("to taste", "pepper"), DEFAULT_GRAMS);
    }

    #[test]
    fn test_parse_bare_number_is_grams() {
        assert_eq!(parse_amount("250", "greek yogurt"), 250.0);
    }

    #[test]
    fn test_format_branches() {
        assert_eq!(format_amount(100.0, "eggs"), "2 large");
        assert_eq!(format_amount(15.0, "olive oil"), "1.0 tbsp");
        assert_eq!(format_amount(1500.0, "potatoes"), "1.50 kg");
        assert_eq!(format_amount(150.4, "chicken breast"), "150 g");
    }

    #[test]
    fn test_format_oil_above_tbsp_range_falls_back_to_grams() {
        assert_eq!(format_amount(80.0, "coconut oil"), "80 g");
    }

    #[test]
    fn test_round_trip_within_a_gram() {
        // parse(format(g, name), name) must reproduce g for each display
        // branch, at values the display rounding represents exactly.
        let cases: &[(f32, &str)] = &[
            (100.0, "eggs"),
            (150.0, "eggs"),
            (15.0, "olive oil"),
            (22.5, "olive oil"),
            (1500.0, "potatoes"),
            (150.0, "chicken breast"),
            (42.0, "white rice"),
        ];
        for &(grams, name) in cases {
            let round_tripped = parse_amount(&format_amount(grams, name), name);
            assert!(
                (round_tripped - grams).abs() <= 1.0,
                "{} g of {} round-tripped to {}",
                grams,
                name,
                round_tripped
            );
        }
    }
}
