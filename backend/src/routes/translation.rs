use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/translations",
            get(commands::translation::get_translations_axum),
        )
        .route(
            "/api/admin/translations/upsert",
            post(commands::translation::upsert_translation_axum),
        )
        .route(
            "/api/admin/translations/update",
            post(commands::translation::update_translation_axum),
        )
        .route(
            "/api/admin/translations/delete",
            post(commands::translation::delete_translation_axum),
        )
        .route(
            "/api/admin/translations/coverage",
            get(commands::translation::get_coverage_axum),
        )
}
