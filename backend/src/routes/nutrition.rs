use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/nutrition/daily-values",
            post(commands::nutrition::get_daily_values_axum),
        )
        .route(
            "/api/nutrition/targets",
            get(commands::nutrition::get_targets_axum),
        )
        .route("/api/nutrition/log", post(commands::nutrition::log_meal_axum))
        .route("/api/nutrition/today", get(commands::nutrition::get_today_axum))
        .route("/api/nutrition/clear", post(commands::nutrition::clear_log_axum))
}
