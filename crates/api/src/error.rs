//! API error type and HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskboard_identity::IdentityError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    /// Duplicate provisioning. Reported as a server error, not handled
    /// specially.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Database error")]
    Database(#[from] sqlx::Error),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Conflict(detail) => {
                tracing::error!(detail = %detail, "Conflict while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Database(e) => {
                tracing::error!(error = %e, "Database error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::MissingHeaders => {
                ApiError::Validation("Missing svix headers".to_string())
            }
            IdentityError::SignatureInvalid => {
                ApiError::Validation("Invalid signature".to_string())
            }
            IdentityError::Payload(_) => ApiError::Validation("Invalid payload".to_string()),
            IdentityError::NoEmailAddress => ApiError::Validation("No email found".to_string()),
            IdentityError::AlreadyProvisioned(id) => {
                ApiError::Conflict(format!("user {id} already provisioned"))
            }
            IdentityError::Database(e) => ApiError::Database(e),
            IdentityError::InvalidSecret => ApiError::Internal,
        }
    }
}
