use crate::db::{DbPool, Translation};
use crate::error::{PantryChefError, PantryChefResult};
use crate::state::{AppState, Language};
use axum::extract::{Json, Query, State as AxumState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

pub const BASE_LANGUAGE: Language = Language::En;

/// Keys are dotted identifiers such as `pantry.lowStock.title`.
pub fn validate_key(key: &str) -> PantryChefResult<String> {
    let key = key.trim();
    let valid = !key.is_empty()
        && key.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        });
    if !valid {
        return Err(PantryChefError::Validation(format!(
            "Invalid translation key '{}'",
            key
        )));
    }
    Ok(key.to_string())
}

fn validate_value(value: &str) -> PantryChefResult<&str> {
    if value.trim().is_empty() {
        return Err(PantryChefError::Validation(
            "Translation value cannot be empty".to_string(),
        ));
    }
    Ok(value)
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub language: Language,
    pub total_keys: usize,
    pub translated: usize,
    pub missing: Vec<String>,
    pub percent: i64,
}

pub fn coverage(language: Language, base_keys: &[String], language_keys: &[String]) -> Coverage {
    let base: BTreeSet<&str> = base_keys.iter().map(String::as_str).collect();
    let have: BTreeSet<&str> = language_keys.iter().map(String::as_str).collect();
    let missing: Vec<String> = base.difference(&have).map(|k| k.to_string()).collect();
    let translated = base.len() - missing.len();
    let percent = if base.is_empty() {
        100
    } else {
        (translated as f64 / base.len() as f64 * 100.0).round() as i64
    };
    Coverage {
        language,
        total_keys: base.len(),
        translated,
        missing,
        percent,
    }
}

/// Wraps user text as a `%...%` ILIKE pattern with backslash, `%` and `_` escaped.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub async fn list_translations_internal(
    pool: &DbPool,
    language: Option<Language>,
    search: Option<String>,
) -> PantryChefResult<Vec<Translation>> {
    let pattern = search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| contains_pattern(&s));

    Ok(sqlx::query_as::<_, Translation>(
        "SELECT id, key, language_code, value, created_at, updated_at FROM translations
         WHERE ($1::text IS NULL OR language_code = $1)
           AND ($2::text IS NULL OR key ILIKE $2 ESCAPE '\\')
         ORDER BY key ASC, language_code ASC",
    )
    .bind(language.map(|l| l.code().to_string()))
    .bind(pattern)
    .fetch_all(pool)
    .await?)
}

pub async fn upsert_translation_internal(
    pool: &DbPool,
    key: &str,
    language: Language,
    value: &str,
) -> PantryChefResult<Translation> {
    let key = validate_key(key)?;
    let value = validate_value(value)?;

    let row = sqlx::query_as::<_, Translation>(
        "INSERT INTO translations (id, key, language_code, value)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (key, language_code)
         DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
         RETURNING id, key, language_code, value, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(&key)
    .bind(language.code())
    .bind(value)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update_translation_internal(
    pool: &DbPool,
    id: Uuid,
    value: &str,
) -> PantryChefResult<Translation> {
    let value = validate_value(value)?;
    sqlx::query_as::<_, Translation>(
        "UPDATE translations SET value = $1, updated_at = NOW() WHERE id = $2
         RETURNING id, key, language_code, value, created_at, updated_at",
    )
    .bind(value)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| PantryChefError::NotFound(format!("Translation '{}'", id)))
}

pub async fn delete_translation_internal(pool: &DbPool, id: Uuid) -> PantryChefResult<()> {
    let result = sqlx::query("DELETE FROM translations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(PantryChefError::NotFound(format!("Translation '{}'", id)));
    }
    Ok(())
}

async fn keys_for(pool: &DbPool, language: Language) -> PantryChefResult<Vec<String>> {
    Ok(
        sqlx::query_scalar::<_, String>("SELECT key FROM translations WHERE language_code = $1")
            .bind(language.code())
            .fetch_all(pool)
            .await?,
    )
}

pub async fn coverage_internal(pool: &DbPool, language: Language) -> PantryChefResult<Coverage> {
    let base = keys_for(pool, BASE_LANGUAGE).await?;
    let have = keys_for(pool, language).await?;
    Ok(coverage(language, &base, &have))
}

// --- Axum handlers ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationQuery {
    pub language: Option<Language>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTranslationInput {
    pub key: String,
    pub language_code: Language,
    pub value: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTranslationInput {
    pub id: Uuid,
    pub value: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTranslationInput {
    pub id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageQuery {
    pub language: Language,
}

pub async fn get_translations_axum(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<TranslationQuery>,
) -> PantryChefResult<Json<Vec<Translation>>> {
    let rows = list_translations_internal(&state.pool, query.language, query.search).await?;
    Ok(Json(rows))
}

pub async fn upsert_translation_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<UpsertTranslationInput>,
) -> PantryChefResult<Json<Translation>> {
    let row =
        upsert_translation_internal(&state.pool, &input.key, input.language_code, &input.value)
            .await?;
    tracing::info!("Translation saved: {} [{}]", row.key, row.language_code);
    Ok(Json(row))
}

pub async fn update_translation_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<UpdateTranslationInput>,
) -> PantryChefResult<Json<Translation>> {
    let row = update_translation_internal(&state.pool, input.id, &input.value).await?;
    tracing::info!("Translation updated: {}", row.id);
    Ok(Json(row))
}

pub async fn delete_translation_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<DeleteTranslationInput>,
) -> PantryChefResult<Json<()>> {
    delete_translation_internal(&state.pool, input.id).await?;
    tracing::info!("Translation deleted: {}", input.id);
    Ok(Json(()))
}

pub async fn get_coverage_axum(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<CoverageQuery>,
) -> PantryChefResult<Json<Coverage>> {
    Ok(Json(coverage_internal(&state.pool, query.language).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn key_format() {
        assert_eq!(validate_key(" pantry.lowStock.title ").unwrap(), "pantry.lowStock.title");
        assert!(validate_key("nav_home").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("pantry..title").is_err());
        assert!(validate_key("has space").is_err());
        assert!(validate_key(".leading").is_err());
    }

    #[test]
    fn search_text_is_matched_literally() {
        assert_eq!(contains_pattern("nav_home"), r"%nav\_home%");
        assert_eq!(contains_pattern("100%"), r"%100\%%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
        assert_eq!(contains_pattern("pantry.title"), "%pantry.title%");
    }

    #[test]
    fn blank_value_is_rejected() {
        assert!(validate_value("   ").is_err());
        assert_eq!(validate_value("مرحبا").unwrap(), "مرحبا");
    }

    #[test]
    fn coverage_lists_missing_keys() {
        let report = coverage(
            Language::Ar,
            &keys(&["a.title", "b.title", "c.title", "d.title"]),
            &keys(&["b.title", "d.title", "orphan.key"]),
        );
        assert_eq!(report.total_keys, 4);
        assert_eq!(report.translated, 2);
        assert_eq!(report.missing, vec!["a.title", "c.title"]);
        assert_eq!(report.percent, 50);
    }

    #[test]
    fn empty_base_counts_as_complete() {
        let report = coverage(Language::Ar, &[], &keys(&["x"]));
        assert_eq!(report.percent, 100);
        assert!(report.missing.is_empty());
    }
}
