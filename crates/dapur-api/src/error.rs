use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use dapur_db::DbError;
use dapur_types::api::ErrorResponse;

/// Every failure a handler can report. The display string is the client
/// message; internal causes are logged where they happen and never echoed.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, forged or expired token. One message for all.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Email sudah terdaftar.")]
    DuplicateEmail,

    #[error("Password salah.")]
    InvalidPassword,

    #[error("Recipe already saved")]
    AlreadySaved,

    #[error("Generation failed")]
    Upstream,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::DuplicateEmail | Self::InvalidPassword => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadySaved => StatusCode::CONFLICT,
            Self::Upstream | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DuplicateEmail => Self::DuplicateEmail,
            DbError::RecipeNotFound => Self::NotFound("Recipe not found"),
            DbError::AlreadySaved => Self::AlreadySaved,
            DbError::SavedRecipeNotFound => Self::NotFound("Saved recipe not found"),
            DbError::Validation(msg) => Self::Validation(msg),
            DbError::Sqlite(_) | DbError::LockPoisoned => {
                error!("Database error: {}", err);
                Self::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// `Json` whose rejections use the `{ "error": ... }` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// A present, non-blank string field.
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::AlreadySaved.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Upstream.to_string(), "Generation failed");
    }

    #[test]
    fn db_errors_hide_internals() {
        let err: ApiError = DbError::LockPoisoned.into();
        assert!(matches!(err, ApiError::Internal));
        assert_eq!(err.to_string(), "Internal server error");

        let err: ApiError = DbError::SavedRecipeNotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn required_rejects_blank() {
        assert!(required(None, "name is required").is_err());
        assert!(required(Some("  ".into()), "name is required").is_err());
        assert_eq!(required(Some("Ana".into()), "name is required").unwrap(), "Ana");
    }
}
