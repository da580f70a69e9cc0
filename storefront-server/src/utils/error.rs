//! Unified error handling
//!
//! [`AppError`] is the application-level error returned by every handler.
//!
//! # Response shapes
//!
//! | Variant | Status | Body |
//! |---------|--------|------|
//! | Unauthorized | 401 | `{"message": ...}` |
//! | Forbidden | 403 | `{"message": ...}` |
//! | NotFound | 404 | `{"message": ...}` |
//! | Validation | 400 | `{"message": ...}` |
//! | Database / Internal | 500 | `{"error": "Server error"}` |
//!
//! Database/internal detail is logged server-side only; the client gets an
//! opaque body.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use shared::response::{ErrorBody, MessageBody};

use crate::db::repository::RepoError;

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication / authorization (4xx) ==========
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    // ========== Business logic (4xx) ==========
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    // ========== System (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("Server error")),
                )
                    .into_response();
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("Server error")),
                )
                    .into_response();
            }
        };

        (status, Json(MessageBody::new(message))).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    /// Missing Authorization header (401)
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Not authorized, no token".to_string())
    }

    /// Malformed/expired token, or a subject that no longer resolves (401)
    pub fn invalid_token() -> Self {
        Self::Unauthorized("Not authorized, token failed".to_string())
    }

    /// Unified login failure, prevents account enumeration (401)
    pub fn invalid_credentials() -> Self {
        Self::Unauthorized("Invalid credentials".to_string())
    }

    /// Role gate failure on an admin-only operation (403)
    pub fn admin_required() -> Self {
        Self::Forbidden("Admin access required".to_string())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// ========== Conversions ==========

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Validation(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Multipart error: {}", e))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        // First declared message wins; the payloads here are small
        let msg = e
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Invalid request data".to_string());
        AppError::Validation(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_errors_map_to_matching_http_classes() {
        let not_found: AppError = RepoError::NotFound("Product x not found".into()).into();
        assert!(matches!(not_found, AppError::NotFound(_)));

        let dup: AppError = RepoError::Duplicate("User already exists".into()).into();
        assert!(matches!(dup, AppError::Validation(_)));
    }
}
