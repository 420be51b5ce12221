use crate::error::PantryChefResult;
use crate::state::{AppState, Direction, Language};
use axum::extract::{Json, State as AxumState};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocaleView {
    pub language: Language,
    pub direction: Direction,
    pub supported: [Language; 2],
}

impl From<Language> for LocaleView {
    fn from(language: Language) -> Self {
        Self {
            language,
            direction: language.direction(),
            supported: Language::SUPPORTED,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLocaleInput {
    pub language: String,
}

pub async fn get_locale_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<LocaleView>> {
    Ok(Json(LocaleView::from(state.session()?.language)))
}

pub async fn set_locale_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<SetLocaleInput>,
) -> PantryChefResult<Json<LocaleView>> {
    let language: Language = input.language.parse()?;
    state.session()?.language = language;
    tracing::info!("Session language set to {}", language);
    Ok(Json(LocaleView::from(language)))
}

pub async fn ping() -> &'static str {
    "pong"
}
