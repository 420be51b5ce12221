use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/recipes", get(commands::recipe::get_recipes_axum))
        .route(
            "/api/recipes/search",
            post(commands::recipe::search_recipes_axum),
        )
        .route(
            "/api/recipes/from-pantry",
            post(commands::recipe::search_from_pantry_axum),
        )
        .route(
            "/api/recipes/nutrition",
            post(commands::recipe::get_recipe_nutrition_axum),
        )
}
