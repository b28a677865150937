//! Error types and their HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::identity::IdentityError;
use crate::validation::NicknameError;

/// Score store failures
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Errors surfaced by the HTTP endpoints
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid nickname")]
    InvalidNickname(#[from] NicknameError),

    #[error("Authentication required")]
    Identity(#[from] IdentityError),

    #[error("Nickname required")]
    NicknameRequired,

    #[error("Score store unavailable")]
    Persistence(#[from] PersistenceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidNickname(_) => StatusCode::BAD_REQUEST,
            AppError::Identity(_) => StatusCode::UNAUTHORIZED,
            AppError::NicknameRequired => StatusCode::FORBIDDEN,
            AppError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Persistence(e) => tracing::error!("Score store error: {}", e),
            other => tracing::debug!("Request rejected: {:?}", other),
        }

        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidNickname(NicknameError::Empty).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Identity(IdentityError::Missing("x-forwarded-user".into())).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::NicknameRequired.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_messages_hide_details() {
        let err = AppError::from(NicknameError::TooLong(21));
        assert_eq!(err.to_string(), "Invalid nickname");
    }
}
