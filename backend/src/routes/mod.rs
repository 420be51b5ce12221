use crate::state::AppState;
use axum::Router;

pub mod admin;
pub mod assistant;
pub mod locale;
pub mod nutrition;
pub mod pantry;
pub mod recipe;
pub mod subscription;
pub mod translation;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(locale::router())
        .merge(nutrition::router())
        .merge(pantry::router())
        .merge(recipe::router())
        .merge(assistant::router())
        .merge(subscription::router())
        .merge(admin::router())
        .merge(translation::router())
}
