//! Built-in food data: the curated booster pools the optimizer draws from
//! when closing macro gaps, a static fallback table of common foods, the
//! per-category default profiles, and a CSV loader for extending the
//! fallback table with a user-supplied file.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use lazy_static::lazy_static;
use std::path::Path;

use crate::ingredient::Category;
use crate::nutrition::{MacroAxis, NutrientProfile};

#[derive(Debug, Clone)]
pub struct FoodRecord {
    pub name: String,
    pub category: Category,
    pub profile: NutrientProfile,
}

/// A curated food chosen for being dense in one target macro.
#[derive(Debug, Clone)]
pub struct BoosterFood {
    pub name: String,
    pub category: Category,
    pub pool: MacroAxis,
    pub profile: NutrientProfile,
}

fn food(name: &str, category: Category, calories: f32, protein: f32, carbs: f32, fat: f32, fiber: f32) -> FoodRecord {
    let mut profile = NutrientProfile::new(calories, protein, carbs, fat);
    profile.fiber_g = fiber;
    FoodRecord {
        name: name.to_string(),
        category,
        profile,
    }
}

fn booster(name: &str, category: Category, pool: MacroAxis, calories: f32, protein: f32, carbs: f32, fat: f32) -> BoosterFood {
    BoosterFood {
        name: name.to_string(),
        category,
        pool,
        profile: NutrientProfile::new(calories, protein, carbs, fat),
    }
}

lazy_static! {
    /// Booster candidate pools, one per gap-fillable macro. Values are
    /// per 100 g.
    pub static ref BOOSTERS: Vec<BoosterFood> = {
        use Category::*;
        vec![
            booster("chicken breast", Protein, MacroAxis::Protein, 165.0, 31.0, 0.0, 3.6),
            booster("turkey breast", Protein, MacroAxis::Protein, 135.0, 30.0, 0.0, 1.0),
            booster("greek yogurt", Protein, MacroAxis::Protein, 59.0, 10.0, 3.6, 0.4),
            booster("egg whites", Protein, MacroAxis::Protein, 52.0, 11.0, 0.7, 0.2),
            booster("firm tofu", Protein, MacroAxis::Protein, 76.0, 8.0, 1.9, 4.8),
            booster("whey protein powder", Protein, MacroAxis::Protein, 370.0, 80.0, 7.0, 3.0),
            booster("cottage cheese", Protein, MacroAxis::Protein, 98.0, 11.0, 3.4, 4.3),
            booster("canned tuna", Protein, MacroAxis::Protein, 116.0, 26.0, 0.0, 0.8),
            booster("cooked lentils", Protein, MacroAxis::Protein, 116.0, 9.0, 20.0, 0.4),
            booster("white rice", Carb, MacroAxis::Carbs, 130.0, 2.7, 28.0, 0.3),
            booster("sweet potato", Carb, MacroAxis::Carbs, 86.0, 1.6, 20.1, 0.1),
            booster("rolled oats", Carb, MacroAxis::Carbs, 389.0, 16.9, 66.3, 6.9),
            booster("cooked quinoa", Carb, MacroAxis::Carbs, 120.0, 4.4, 21.3, 1.9),
            booster("banana", Fruit, MacroAxis::Carbs, 89.0, 1.1, 22.8, 0.3),
            booster("whole wheat bread", Carb, MacroAxis::Carbs, 247.0, 13.0, 41.0, 3.4),
            booster("cooked pasta", Carb, MacroAxis::Carbs, 158.0, 5.8, 31.0, 0.9),
            booster("olive oil", Fat, MacroAxis::Fat, 884.0, 0.0, 0.0, 100.0),
            booster("almonds", Fat, MacroAxis::Fat, 579.0, 21.2, 21.6, 49.9),
            booster("peanut butter", Fat, MacroAxis::Fat, 588.0, 25.1, 19.6, 50.4),
            booster("avocado", Fat, MacroAxis::Fat, 160.0, 2.0, 8.5, 14.7),
            booster("chia seeds", Fat, MacroAxis::Fat, 486.0, 16.5, 42.1, 30.7),
            booster("walnuts", Fat, MacroAxis::Fat, 654.0, 15.2, 13.7, 65.2),
        ]
    };

    /// Fallback table of common foods, matched by substring when an
    /// ingredient misses both the booster table and the cache. Values are
    /// per 100 g: calories, protein, carbs, fat, fiber.
    pub static ref COMMON_FOODS: Vec<FoodRecord> = {
        use Category::*;
        vec![
            // Proteins
            food("chicken breast", Protein, 165.0, 31.0, 0.0, 3.6, 0.0),
            food("chicken thigh", Protein, 209.0, 26.0, 0.0, 10.9, 0.0),
            food("turkey breast", Protein, 135.0, 30.0, 0.0, 1.0, 0.0),
            food("ground beef", Protein, 250.0, 26.0, 0.0, 15.0, 0.0),
            food("beef steak", Protein, 271.0, 25.0, 0.0, 19.0, 0.0),
            food("pork loin", Protein, 242.0, 27.0, 0.0, 14.0, 0.0),
            food("salmon", Protein, 208.0, 20.0, 0.0, 13.0, 0.0),
            food("tuna", Protein, 132.0, 28.0, 0.0, 1.3, 0.0),
            food("cod", Protein, 82.0, 18.0, 0.0, 0.7, 0.0),
            food("shrimp", Protein, 99.0, 24.0, 0.2, 0.3, 0.0),
            food("egg", Protein, 155.0, 13.0, 1.1, 11.0, 0.0),
            food("egg white", Protein, 52.0, 11.0, 0.7, 0.2, 0.0),
            food("greek yogurt", Protein, 59.0, 10.0, 3.6, 0.4, 0.0),
            food("cottage cheese", Protein, 98.0, 11.0, 3.4, 4.3, 0.0),
            food("tofu", Protein, 76.0, 8.0, 1.9, 4.8, 0.3),
            food("tempeh", Protein, 193.0, 19.0, 9.4, 11.0, 0.0),
            food("whey protein", Protein, 370.0, 80.0, 7.0, 3.0, 0.0),
            food("lentils", Protein, 116.0, 9.0, 20.0, 0.4, 7.9),
            food("black beans", Protein, 132.0, 8.9, 23.7, 0.5, 8.7),
            food("chickpeas", Protein, 164.0, 8.9, 27.4, 2.6, 7.6),
            // Carbs
            food("white rice", Carb, 130.0, 2.7, 28.0, 0.3, 0.4),
            food("brown rice", Carb, 111.0, 2.6, 23.0, 0.9, 1.8),
            food("pasta", Carb, 158.0, 5.8, 31.0, 0.9, 1.8),
            food("bread", Carb, 265.0, 9.0, 49.0, 3.2, 2.7),
            food("whole wheat bread", Carb, 247.0, 13.0, 41.0, 3.4, 7.0),
            food("oats", Carb, 389.0, 16.9, 66.3, 6.9, 10.6),
            food("quinoa", Carb, 120.0, 4.4, 21.3, 1.9, 2.8),
            food("potato", Carb, 77.0, 2.0, 17.0, 0.1, 2.2),
            food("sweet potato", Carb, 86.0, 1.6, 20.1, 0.1, 3.0),
            food("tortilla", Carb, 310.0, 8.0, 52.0, 7.0, 3.0),
            food("couscous", Carb, 112.0, 3.8, 23.2, 0.2, 1.4),
            food("honey", Carb, 304.0, 0.3, 82.4, 0.0, 0.2),
            // Fats
            food("olive oil", Fat, 884.0, 0.0, 0.0, 100.0, 0.0),
            food("coconut oil", Fat, 862.0, 0.0, 0.0, 100.0, 0.0),
            food("butter", Fat, 717.0, 0.9, 0.1, 81.0, 0.0),
            food("avocado", Fat, 160.0, 2.0, 8.5, 14.7, 6.7),
            food("almonds", Fat, 579.0, 21.2, 21.6, 49.9, 12.5),
            food("walnuts", Fat, 654.0, 15.2, 13.7, 65.2, 6.7),
            food("cashews", Fat, 553.0, 18.2, 30.2, 43.9, 3.3),
            food("peanut butter", Fat, 588.0, 25.1, 19.6, 50.4, 6.0),
            food("chia seeds", Fat, 486.0, 16.5, 42.1, 30.7, 34.4),
            food("flax seeds", Fat, 534.0, 18.3, 28.9, 42.2, 27.3),
            food("cheese", Fat, 402.0, 25.0, 1.3, 33.0, 0.0),
            // Vegetables
            food("spinach", Vegetable, 23.0, 2.9, 3.6, 0.4, 2.2),
            food("broccoli", Vegetable, 34.0, 2.8, 6.6, 0.4, 2.6),
            food("kale", Vegetable, 49.0, 4.3, 8.8, 0.9, 3.6),
            food("lettuce", Vegetable, 15.0, 1.4, 2.9, 0.2, 1.3),
            food("tomato", Vegetable, 18.0, 0.9, 3.9, 0.2, 1.2),
            food("cucumber", Vegetable, 15.0, 0.7, 3.6, 0.1, 0.5),
            food("carrot", Vegetable, 41.0, 0.9, 9.6, 0.2, 2.8),
            food("bell pepper", Vegetable, 31.0, 1.0, 6.0, 0.3, 2.1),
            food("zucchini", Vegetable, 17.0, 1.2, 3.1, 0.3, 1.0),
            food("cauliflower", Vegetable, 25.0, 1.9, 5.0, 0.3, 2.0),
            food("mushroom", Vegetable, 22.0, 3.1, 3.3, 0.3, 1.0),
            food("onion", Vegetable, 40.0, 1.1, 9.3, 0.1, 1.7),
            // Fruits
            food("apple", Fruit, 52.0, 0.3, 13.8, 0.2, 2.4),
            food("banana", Fruit, 89.0, 1.1, 22.8, 0.3, 2.6),
            food("orange", Fruit, 47.0, 0.9, 11.8, 0.1, 2.4),
            food("blueberries", Fruit, 57.0, 0.7, 14.5, 0.3, 2.4),
            food("strawberries", Fruit, 32.0, 0.7, 7.7, 0.3, 2.0),
            food("grapes", Fruit, 69.0, 0.7, 18.1, 0.2, 0.9),
            food("mango", Fruit, 60.0, 0.8, 15.0, 0.4, 1.6),
        ]
    };
}

/// Per-100g default profile for an ingredient that resolved nowhere else.
/// A lookup must always produce something, so every category has one.
pub fn category_default(category: Category) -> NutrientProfile {
    match category {
        Category::Protein => NutrientProfile::new(165.0, 25.0, 0.0, 5.0),
        Category::Carb => NutrientProfile::new(130.0, 3.0, 28.0, 1.0),
        Category::Fat => NutrientProfile::new(400.0, 2.0, 5.0, 40.0),
        Category::Vegetable => NutrientProfile::new(25.0, 2.0, 5.0, 0.2),
        Category::Fruit => NutrientProfile::new(60.0, 0.8, 14.0, 0.3),
        Category::Other => NutrientProfile::new(150.0, 5.0, 15.0, 5.0),
    }
}

// Expected column headers for user-supplied food tables.
const NAME_COL: &str = "Name";
const CATEGORY_COL: &str = "Category";
const KCAL_COL: &str = "kcal/100g";
const PROTEIN_COL: &str = "Protein (g/100g)";
const CARB_COL: &str = "Carbohydrate (g/100g)";
const FAT_COL: &str = "Fat (g/100g)";
const FIBER_COL: &str = "Fiber (g/100g)";

fn parse_optional_f32(s: &str) -> Option<f32> {
    s.trim().parse::<f32>().ok()
}

fn parse_category(s: &str, name: &str) -> Category {
    match s.trim().to_lowercase().as_str() {
        "protein" => Category::Protein,
        "carb" | "carbs" | "carbohydrate" => Category::Carb,
        "fat" => Category::Fat,
        "vegetable" => Category::Vegetable,
        "fruit" => Category::Fruit,
        "other" => Category::Other,
        _ => Category::classify(name),
    }
}

/// Loads additional fallback-table records from a CSV file. Rows with an
/// empty name are skipped; missing nutrient cells default to zero.
pub fn load_food_table(csv_path: &Path) -> Result<Vec<FoodRecord>> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("food table CSV not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open food table CSV at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();
    let col = |wanted: &str| {
        headers
            .iter()
            .position(|h| h == wanted)
            .ok_or_else(|| anyhow::anyhow!("column '{}' not found", wanted))
    };

    let name_idx = col(NAME_COL)?;
    let category_idx = col(CATEGORY_COL)?;
    let kcal_idx = col(KCAL_COL)?;
    let protein_idx = col(PROTEIN_COL)?;
    let carb_idx = col(CARB_COL)?;
    let fat_idx = col(FAT_COL)?;
    let fiber_idx = headers.iter().position(|h| h == FIBER_COL);

    let mut records = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("failed to read record at row index {}", row_index))?;

        let name = record
            .get(name_idx)
            .ok_or_else(|| anyhow::anyhow!("missing name at row {}", row_index))?
            .trim()
            .to_string();
        if name.is_empty() {
            continue;
        }

        let cell = |idx: usize| record.get(idx).and_then(parse_optional_f32).unwrap_or(0.0);

        let category = parse_category(record.get(category_idx).unwrap_or(""), &name);
        let mut profile = NutrientProfile::new(cell(kcal_idx), cell(protein_idx), cell(carb_idx), cell(fat_idx));
        profile.fiber_g = fiber_idx.map(cell).unwrap_or(0.0);

        records.push(FoodRecord {
            name,
            category,
            profile,
        });
    }

    if records.is_empty() {
        return Err(anyhow::anyhow!("no valid food records loaded from {:?}", csv_path));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_booster_pools_cover_each_macro() {
        for axis in [MacroAxis::Protein, MacroAxis::Carbs, MacroAxis::Fat] {
            let pool: Vec<_> = BOOSTERS.iter().filter(|b| b.pool == axis).collect();
            assert!(!pool.is_empty(), "no boosters for {:?}", axis);
            for b in pool {
                assert!(
                    b.profile.value_of(axis) > 0.0,
                    "{} is not dense in its own pool macro",
                    b.name
                );
            }
        }
    }

    #[test]
    fn test_common_foods_table_is_populated() {
        assert!(COMMON_FOODS.len() >= 60);
        assert!(COMMON_FOODS.iter().all(|f| !f.name.is_empty()));
        assert!(COMMON_FOODS.iter().all(|f| f.profile.calories >= 0.0));
    }

    fn create_test_csv_file() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            NAME_COL, CATEGORY_COL, KCAL_COL, PROTEIN_COL, CARB_COL, FAT_COL, FIBER_COL
        )?;
        writeln!(file, "Seitan,protein,370,75,14,1.9,0.6")?;
        writeln!(file, "Plantain,,122,1.3,31.9,0.4,2.3")?; // category inferred from name
        writeln!(file, ",other,10,1,1,1,0")?; // empty name row
        writeln!(file, "Mystery,other,text,1,2,3,0")?; // unparseable kcal -> 0
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_food_table_success() -> Result<()> {
        let file = create_test_csv_file()?;
        let records = load_food_table(file.path())?;

        assert_eq!(records.len(), 3); // empty-name row skipped

        let seitan = records.iter().find(|r| r.name == "Seitan").unwrap();
        assert_eq!(seitan.category, Category::Protein);
        assert_eq!(seitan.profile.protein_g, 75.0);
        assert_eq!(seitan.profile.fiber_g, 0.6);

        let mystery = records.iter().find(|r| r.name == "Mystery").unwrap();
        assert_eq!(mystery.profile.calories, 0.0);
        Ok(())
    }

    #[test]
    fn test_load_food_table_missing_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{},{},{},{},{}", NAME_COL, CATEGORY_COL, KCAL_COL, PROTEIN_COL, FAT_COL)?;
        writeln!(file, "Seitan,protein,370,75,1.9")?;
        file.flush()?;

        let result = load_food_table(file.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains(&format!("column '{}' not found", CARB_COL)));
        Ok(())
    }

    #[test]
    fn test_load_food_table_file_not_found() {
        let result = load_food_table(Path::new("this_file_does_not_exist.csv"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
