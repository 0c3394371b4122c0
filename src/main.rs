use anyhow::{Context, Result};
use std::path::Path;

use macro_optim::api_connection::connection::FdcClient;
use macro_optim::cli::parse_args;
use macro_optim::ingredient::Ingredient;
use macro_optim::lookup::cache::JsonFileStore;
use macro_optim::lookup::food_table::load_food_table;
use macro_optim::lookup::NutritionLookup;
use macro_optim::meal_draft::MealDraft;
use macro_optim::optim::gap_fill::DietaryConstraint;
use macro_optim::optim::targets::TargetMacros;
use macro_optim::planner::MealPlanner;

// Environment variable holding the FoodData Central API key.
const FDC_API_KEY_ENV_VAR: &str = "FDC_API_KEY";

/// Warms the nutrition cache from the food database for ingredients that
/// would otherwise fall through to category defaults. All network I/O
/// happens here, before the synchronous solve; every failure degrades to
/// the fallback tables.
async fn prefetch_nutrition(lookup: &NutritionLookup, ingredients: &[Ingredient]) {
    let client = match FdcClient::from_env(FDC_API_KEY_ENV_VAR) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Skipping pre-fetch ({}), using built-in nutrition data.", e);
            return;
        }
    };

    for ingredient in ingredients {
        if lookup.has_data(&ingredient.name) {
            continue;
        }
        match client.lookup_profile(&ingredient.name).await {
            Ok(Some(profile)) => {
                println!(
                    " > Fetched nutrition for '{}': {:.0} kcal, {:.1} g protein per 100 g",
                    ingredient.name, profile.calories, profile.protein_g
                );
                lookup.warm(&ingredient.name, &profile);
            }
            Ok(None) => {
                println!(" > No food-database match for '{}', using fallback.", ingredient.name);
            }
            Err(e) => {
                eprintln!(" > Food-database lookup failed for '{}': {}", ingredient.name, e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = parse_args();

    let draft_text = tokio::fs::read_to_string(&args.meal_file)
        .await
        .with_context(|| format!("Failed to read meal draft file '{}'", args.meal_file))?;
    let draft = MealDraft::from_json(&draft_text)?;
    let ingredients = draft.to_ingredients();
    println!("Optimizing '{}' ({} ingredients)...", draft.meal_name, ingredients.len());

    let store = JsonFileStore::open(Path::new(&args.cache_file));
    let mut lookup = NutritionLookup::new(Box::new(store));

    if let Some(foods_csv) = &args.foods_csv {
        let records = load_food_table(Path::new(foods_csv))
            .with_context(|| format!("Failed to load food table '{}'", foods_csv))?;
        println!("Loaded {} extra food records from '{}'.", records.len(), foods_csv);
        lookup.extend_food_table(records);
    }

    if args.prefetch {
        prefetch_nutrition(&lookup, &ingredients).await;
    }

    let target = TargetMacros::new(args.calories, args.protein, args.carbs, args.fat);
    let constraint = DietaryConstraint::new(args.restrictions.clone(), args.allergies.clone());

    let planner = MealPlanner::new(lookup);
    let result = planner.optimize_meal(ingredients, &target, &constraint, args.tolerance)?;

    println!("\nOptimized portions:");
    for ingredient in &result.ingredients {
        let marker = if result.added_by_gap_fill.contains(&ingredient.name) {
            "  (added)"
        } else {
            ""
        };
        println!(
            "  {:<24} {:>8.1} g   ({}){}",
            ingredient.name, ingredient.amount_g, ingredient.display_amount, marker
        );
    }

    println!(
        "\nAchieved: {:.0} kcal, {:.1} g protein, {:.1} g carbs, {:.1} g fat",
        result.achieved.calories,
        result.achieved.protein_g,
        result.achieved.carbs_g,
        result.achieved.fat_g
    );

    println!("\nAccuracy report:");
    println!("  {:<10} {:>8} {:>8} {:>8}  {}", "macro", "target", "actual", "dev %", "status");
    for (axis, deviation) in result.report.iter() {
        println!(
            "  {:<10} {:>8.1} {:>8.1} {:>7.1}%  {}",
            axis.label(),
            deviation.target,
            deviation.actual,
            deviation.deviation_pct,
            deviation.status
        );
    }

    if !result.converged {
        println!("\nNote: meal is outside the requested tolerance; accuracy above is best effort.");
    }

    Ok(())
}
