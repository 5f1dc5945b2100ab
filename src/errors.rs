//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Incorrect password")]
    InvalidCredentials,

    #[error("Account is temporarily blocked")]
    Blocked,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[error("Database error")]
    Database(DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Error details attached to the response for out-of-band reporting.
///
/// Carries the internal detail that is never sent to the client.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub code: &'static str,
    pub detail: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "WRONG_PASSWORD",
            AppError::Blocked => "BLOCKED_USER",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Blocked => StatusCode::LOCKED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Conflict(msg) => format!("{} already exists", msg),

            // Hide details for internal/security errors
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Jwt(_) => "Invalid or expired token".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),

            // Use default message for others
            _ => self.to_string(),
        }
    }

    /// Full internal description, for logs and error reports only
    fn detail(&self) -> String {
        match self {
            AppError::Database(e) => format!("{:?}", e),
            AppError::Jwt(e) => format!("{:?}", e),
            AppError::Internal(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let report = ErrorReport {
            code: self.code(),
            detail: self.detail(),
        };

        if status.is_server_error() {
            tracing::error!(code = report.code, "{}", report.detail);
        } else if matches!(self, AppError::Jwt(_)) {
            tracing::debug!(code = report.code, "{}", report.detail);
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: report.code.to_string(),
                message: self.user_message(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        let sql = err.sql_err();
        from_db_err(err, sql)
    }
}

/// Unique index violations are client conflicts, everything else stays a
/// server-side database error.
fn from_db_err(err: DbErr, sql: Option<SqlErr>) -> AppError {
    match sql {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(%detail, "Unique constraint violated");
            AppError::Conflict("Record".to_string())
        }
        _ => AppError::Database(err),
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_is_distinct_from_wrong_password() {
        assert_ne!(AppError::Blocked.code(), AppError::InvalidCredentials.code());
        assert_ne!(AppError::Blocked.status(), AppError::InvalidCredentials.status());
        assert_eq!(AppError::Blocked.status(), StatusCode::LOCKED);
    }

    #[test]
    fn test_internal_detail_is_attached_but_hidden() {
        let response = AppError::internal("connection reset by peer").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert_eq!(report.code, "INTERNAL_ERROR");
        assert_eq!(report.detail, "connection reset by peer");
    }

    #[test]
    fn test_unique_violation_is_a_conflict() {
        let err = from_db_err(
            DbErr::Custom("insert failed".to_string()),
            Some(SqlErr::UniqueConstraintViolation(
                "duplicate key value violates unique constraint \"bots_name_key\"".to_string(),
            )),
        );
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_other_db_errors_stay_internal() {
        let err = from_db_err(
            DbErr::Custom("insert failed".to_string()),
            Some(SqlErr::ForeignKeyConstraintViolation("bots_owner_fkey".to_string())),
        );
        assert!(matches!(err, AppError::Database(_)));

        let err = AppError::from(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_ok_or_not_found() {
        let missing: Option<i32> = None;
        assert!(matches!(missing.ok_or_not_found(), Err(AppError::NotFound)));
        assert_eq!(Some(3).ok_or_not_found().unwrap(), 3);
    }
}
