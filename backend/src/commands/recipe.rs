use crate::commands::nutrition::{nutrition_label, NutritionLabel, NutritionalData};
use crate::error::{PantryChefError, PantryChefResult};
use crate::state::AppState;
use axum::extract::{Json, State as AxumState};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub title_ar: String,
    pub cuisine: String,
    pub diets: Vec<String>,
    pub minutes: u32,
    pub servings: u32,
    pub ingredients: Vec<String>,
    pub nutrition: NutritionalData,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilter {
    pub diet: Option<String>,
    pub max_minutes: Option<u32>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeMatch {
    pub recipe: Recipe,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub match_percent: u8,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// "chicken" matches "chicken breast" and the other way round.
pub fn ingredient_matches(wanted: &str, available: &str) -> bool {
    let (w, a) = (normalize(wanted), normalize(available));
    !w.is_empty() && !a.is_empty() && (w.contains(&a) || a.contains(&w))
}

pub fn search_by_ingredients(
    catalogue: &[Recipe],
    available: &[String],
    filter: &SearchFilter,
) -> Vec<RecipeMatch> {
    let diet = filter.diet.as_deref().map(normalize).filter(|d| !d.is_empty());

    let mut results: Vec<RecipeMatch> = catalogue
        .iter()
        .filter(|r| match &diet {
            Some(d) => r.diets.iter().any(|x| normalize(x) == *d),
            None => true,
        })
        .filter(|r| filter.max_minutes.map_or(true, |max| r.minutes <= max))
        .filter_map(|recipe| {
            let (matched, missing): (Vec<String>, Vec<String>) = recipe
                .ingredients
                .iter()
                .cloned()
                .partition(|ing| available.iter().any(|a| ingredient_matches(ing, a)));

            if matched.is_empty() {
                return None;
            }
            let total = recipe.ingredients.len().max(1) as f64;
            let match_percent = (matched.len() as f64 / total * 100.0).round() as u8;

            Some(RecipeMatch {
                recipe: recipe.clone(),
                matched,
                missing,
                match_percent,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.match_percent
            .cmp(&a.match_percent)
            .then(a.missing.len().cmp(&b.missing.len()))
            .then_with(|| a.recipe.title.cmp(&b.recipe.title))
    });
    results
}

pub fn find_recipe<'a>(catalogue: &'a [Recipe], id: &str) -> PantryChefResult<&'a Recipe> {
    catalogue
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| PantryChefError::NotFound(format!("Recipe '{}'", id)))
}

pub fn recipe_nutrition(recipe: &Recipe, servings: Option<u32>) -> PantryChefResult<NutritionLabel> {
    nutrition_label(&recipe.nutrition, servings.unwrap_or(recipe.servings))
}

pub fn catalogue() -> Vec<Recipe> {
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    vec![
        Recipe {
            id: "chickpea-spinach-curry".into(),
            title: "Chickpea & Spinach Curry".into(),
            title_ar: "كاري الحمص والسبانخ".into(),
            cuisine: "Indian".into(),
            diets: strings(&["vegetarian", "vegan", "dairy-free"]),
            minutes: 30,
            servings: 4,
            ingredients: strings(&["chickpeas", "spinach", "tomatoes", "onion", "garlic", "curry powder"]),
            nutrition: NutritionalData {
                calories: Some(1280.0),
                protein: Some(52.0),
                carbohydrates: Some(176.0),
                fat: Some(36.0),
                fiber: Some(48.0),
                sodium: Some(1600.0),
                iron: Some(22.0),
                vitamin_c: Some(96.0),
                vitamin_a: Some(1900.0),
                folate: Some(1100.0),
                ..Default::default()
            },
        },
        Recipe {
            id: "lemon-herb-chicken".into(),
            title: "Lemon Herb Chicken with Rice".into(),
            title_ar: "دجاج بالليمون والأعشاب مع الأرز".into(),
            cuisine: "Mediterranean".into(),
            diets: strings(&["high-protein", "dairy-free", "gluten-free"]),
            minutes: 45,
            servings: 4,
            ingredients: strings(&["chicken breast", "rice", "lemon", "garlic", "olive oil"]),
            nutrition: NutritionalData {
                calories: Some(2100.0),
                protein: Some(168.0),
                carbohydrates: Some(190.0),
                fat: Some(64.0),
                sodium: Some(1400.0),
                vitamin_b6: Some(4.4),
                niacin: Some(60.0),
                ..Default::default()
            },
        },
        Recipe {
            id: "shakshuka".into(),
            title: "Shakshuka".into(),
            title_ar: "شكشوكة".into(),
            cuisine: "Middle Eastern".into(),
            diets: strings(&["vegetarian", "gluten-free"]),
            minutes: 25,
            servings: 2,
            ingredients: strings(&["eggs", "tomatoes", "onion", "bell pepper", "olive oil", "cumin"]),
            nutrition: NutritionalData {
                calories: Some(620.0),
                protein: Some(30.0),
                carbohydrates: Some(34.0),
                fat: Some(40.0),
                cholesterol: Some(744.0),
                vitamin_c: Some(160.0),
                vitamin_b12: Some(2.2),
                ..Default::default()
            },
        },
        Recipe {
            id: "creamy-mushroom-pasta".into(),
            title: "Creamy Mushroom Pasta".into(),
            title_ar: "باستا الفطر بالكريمة".into(),
            cuisine: "Italian".into(),
            diets: strings(&["vegetarian"]),
            minutes: 20,
            servings: 2,
            ingredients: strings(&["pasta", "mushrooms", "milk", "parmesan", "garlic"]),
            nutrition: NutritionalData {
                calories: Some(1340.0),
                protein: Some(52.0),
                carbohydrates: Some(180.0),
                fat: Some(42.0),
                saturated_fat: Some(22.0),
                calcium: Some(780.0),
                vitamin_d: Some(6.0),
                ..Default::default()
            },
        },
        Recipe {
            id: "rice-pudding".into(),
            title: "Cardamom Rice Pudding".into(),
            title_ar: "أرز بالحليب والهيل".into(),
            cuisine: "Middle Eastern".into(),
            diets: strings(&["vegetarian", "gluten-free"]),
            minutes: 40,
            servings: 4,
            ingredients: strings(&["rice", "milk", "sugar", "cardamom"]),
            nutrition: NutritionalData {
                calories: Some(1160.0),
                protein: Some(32.0),
                carbohydrates: Some(210.0),
                fat: Some(20.0),
                sugar: Some(110.0),
                added_sugar: Some(80.0),
                calcium: Some(1200.0),
                ..Default::default()
            },
        },
        Recipe {
            id: "tomato-lentil-soup".into(),
            title: "Tomato Lentil Soup".into(),
            title_ar: "شوربة العدس بالطماطم".into(),
            cuisine: "Levantine".into(),
            diets: strings(&["vegetarian", "vegan", "dairy-free", "gluten-free"]),
            minutes: 35,
            servings: 4,
            ingredients: strings(&["lentils", "tomatoes", "onion", "carrot", "cumin"]),
            nutrition: NutritionalData {
                calories: Some(920.0),
                protein: Some(56.0),
                carbohydrates: Some(150.0),
                fat: Some(8.0),
                fiber: Some(60.0),
                potassium: Some(2600.0),
                iron: Some(18.0),
                ..Default::default()
            },
        },
    ]
}

// --- Axum handlers ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    /// Falls back to the session ingredient list when omitted.
    pub ingredients: Option<Vec<String>>,
    #[serde(flatten)]
    pub filter: SearchFilter,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeNutritionInput {
    pub id: String,
    pub servings: Option<u32>,
}

pub async fn get_recipes_axum() -> Json<Vec<Recipe>> {
    Json(catalogue())
}

pub async fn search_recipes_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<SearchInput>,
) -> PantryChefResult<Json<Vec<RecipeMatch>>> {
    let available = match input.ingredients {
        Some(list) => list,
        None => state.session()?.ingredients.names(),
    };
    if available.iter().all(|s| s.trim().is_empty()) {
        return Err(PantryChefError::Validation(
            "Please add at least one ingredient".to_string(),
        ));
    }
    let results = search_by_ingredients(&catalogue(), &available, &input.filter);
    tracing::info!(
        "Recipe search with {} ingredients -> {} matches",
        available.len(),
        results.len()
    );
    Ok(Json(results))
}

pub async fn search_from_pantry_axum(
    AxumState(state): AxumState<AppState>,
    Json(filter): Json<SearchFilter>,
) -> PantryChefResult<Json<Vec<RecipeMatch>>> {
    let available = state.session()?.pantry.available_names();
    Ok(Json(search_by_ingredients(&catalogue(), &available, &filter)))
}

pub async fn get_recipe_nutrition_axum(
    Json(input): Json<RecipeNutritionInput>,
) -> PantryChefResult<Json<NutritionLabel>> {
    let recipes = catalogue();
    let recipe = find_recipe(&recipes, &input.id)?;
    Ok(Json(recipe_nutrition(recipe, input.servings)?))
}
