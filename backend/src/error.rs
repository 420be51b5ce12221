use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PantryChefError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Cannot move from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Serialized as its display string so errors can be embedded in JSON payloads.
impl Serialize for PantryChefError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type PantryChefResult<T> = Result<T, PantryChefError>;

pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

impl PantryChefError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PantryChefError::Validation(_) => StatusCode::BAD_REQUEST,
            PantryChefError::NotFound(_) => StatusCode::NOT_FOUND,
            PantryChefError::InvalidTransition { .. } => StatusCode::CONFLICT,
            PantryChefError::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PantryChefError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            PantryChefError::Validation(_)
            | PantryChefError::NotFound(_)
            | PantryChefError::InvalidTransition { .. }
            | PantryChefError::QuotaExceeded(_) => {
                tracing::warn!("Request rejected: {}", self);
                self.to_string()
            }
            PantryChefError::Database(ref e) => {
                tracing::error!("Database Error: {:?}", e);
                GENERIC_ERROR_MESSAGE.to_string()
            }
            _ => {
                tracing::error!("Unhandled Error: {:?}", self);
                GENERIC_ERROR_MESSAGE.to_string()
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let err = PantryChefError::Validation("Please provide a reason for rejection".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Please provide a reason for rejection");

        let err = PantryChefError::InvalidTransition {
            from: "approved".into(),
            to: "rejected".into(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Cannot move from 'approved' to 'rejected'");
    }

    #[test]
    fn server_errors_map_to_500() {
        let err = PantryChefError::Internal("boom".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn serializes_as_string() {
        let err = PantryChefError::NotFound("Pantry item 'x'".into());
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value, json!("Pantry item 'x' not found"));
    }
}
