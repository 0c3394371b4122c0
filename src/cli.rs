use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the meal draft JSON file
    #[arg(short, long)]
    pub meal_file: String,

    /// Target calories (kcal)
    #[arg(long, default_value_t = 0.0)]
    pub calories: f32,

    /// Target protein (g)
    #[arg(long, default_value_t = 0.0)]
    pub protein: f32,

    /// Target carbohydrates (g)
    #[arg(long, default_value_t = 0.0)]
    pub carbs: f32,

    /// Target fat (g)
    #[arg(long, default_value_t = 0.0)]
    pub fat: f32,

    /// Fractional convergence tolerance (0.01-0.15 is the useful range)
    #[arg(long, default_value_t = 0.05)]
    pub tolerance: f32,

    /// Dietary restriction, repeatable (vegetarian, vegan, dairy-free, gluten-free)
    #[arg(long = "restriction")]
    pub restrictions: Vec<String>,

    /// Allergen to exclude by name, repeatable
    #[arg(long = "allergy")]
    pub allergies: Vec<String>,

    /// Path of the persistent nutrition cache
    #[arg(long, default_value = "nutrition_cache.json")]
    pub cache_file: String,

    /// Optional CSV food table extending the built-in fallback data
    #[arg(long)]
    pub foods_csv: Option<String>,

    /// Pre-fetch unknown ingredients from FoodData Central before optimizing
    #[arg(long, default_value_t = false)]
    pub prefetch: bool,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
