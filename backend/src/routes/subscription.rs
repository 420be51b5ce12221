use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/subscription",
            get(commands::subscription::get_subscription_axum),
        )
        .route(
            "/api/subscription/plans",
            get(commands::subscription::get_plans_axum),
        )
        .route(
            "/api/subscription/change",
            post(commands::subscription::change_plan_axum),
        )
        .route(
            "/api/subscription/cancel",
            post(commands::subscription::cancel_subscription_axum),
        )
}
