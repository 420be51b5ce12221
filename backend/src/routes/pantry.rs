use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        // Ingredient entry list
        .route(
            "/api/ingredients",
            get(commands::pantry::get_ingredients_axum),
        )
        .route(
            "/api/ingredients/add",
            post(commands::pantry::add_ingredient_axum),
        )
        .route(
            "/api/ingredients/remove",
            post(commands::pantry::remove_ingredient_axum),
        )
        .route(
            "/api/ingredients/clear",
            post(commands::pantry::clear_ingredients_axum),
        )
        // Pantry
        .route("/api/pantry", get(commands::pantry::get_pantry_axum))
        .route("/api/pantry/add", post(commands::pantry::add_pantry_item_axum))
        .route(
            "/api/pantry/remove",
            post(commands::pantry::remove_pantry_item_axum),
        )
        .route(
            "/api/pantry/quantity",
            post(commands::pantry::update_quantity_axum),
        )
        .route(
            "/api/pantry/low-stock",
            get(commands::pantry::get_low_stock_axum),
        )
        .route(
            "/api/pantry/expiring",
            get(commands::pantry::get_expiring_axum),
        )
        .route(
            "/api/pantry/categories",
            get(commands::pantry::get_categories_axum),
        )
}
