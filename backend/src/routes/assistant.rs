use crate::commands;
use crate::state::AppState;
use axum::{routing::post, Router};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/assistant/personalize",
        post(commands::assistant::personalize_axum),
    )
}
