use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ping", get(commands::locale::ping))
        .route(
            "/api/locale",
            get(commands::locale::get_locale_axum).post(commands::locale::set_locale_axum),
        )
}
