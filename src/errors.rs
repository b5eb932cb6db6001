// ABOUTME: Unified error handling with standard error codes and HTTP responses
// ABOUTME: Maps every failure class to a status code and a {success:false, message} JSON body
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Unified Error Handling
//!
//! Central error types for the portfolio backend. Every handler returns
//! [`AppResult`]; failures are converted into structured JSON responses at the
//! axum boundary and are never retried.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (400)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    /// Duplicate email/username. Reported as 400 by this API's convention.
    #[serde(rename = "CONFLICT")]
    Conflict,

    // Authentication (401)
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired,
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid,
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired,
    #[serde(rename = "WRONG_TOKEN_TYPE")]
    WrongTokenType,
    #[serde(rename = "PRINCIPAL_NOT_FOUND")]
    PrincipalNotFound,
    #[serde(rename = "PRINCIPAL_INACTIVE")]
    PrincipalInactive,

    // Authorization (403)
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied,

    // Resources (404)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,

    // Internal (500)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::Conflict => {
                StatusCode::BAD_REQUEST
            }
            Self::AuthRequired
            | Self::AuthInvalid
            | Self::AuthExpired
            | Self::WrongTokenType
            | Self::PrincipalNotFound
            | Self::PrincipalInactive => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::ConfigError | Self::DatabaseError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Generic, caller-safe description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::Conflict => "A resource with this identifier already exists",
            Self::AuthRequired => "Access denied. No token provided.",
            Self::AuthInvalid => "Access denied. Invalid token.",
            Self::AuthExpired => "Access denied. Token expired.",
            Self::WrongTokenType => "Access denied. Invalid token type.",
            Self::PrincipalNotFound => "Access denied. Account not found.",
            Self::PrincipalInactive => "Access denied. Account is deactivated.",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ConfigError => "Configuration error encountered",
            Self::DatabaseError => "Database operation failed",
            Self::InternalError => "Internal server error",
        }
    }

    /// Whether this code represents an unexpected server-side failure
    #[must_use]
    pub const fn is_internal(self) -> bool {
        matches!(
            self,
            Self::ConfigError | Self::DatabaseError | Self::InternalError
        )
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Missing or malformed input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// A required field was blank or absent
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message)
    }

    /// Duplicate email/username within a collection
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// No token supplied
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(
            ErrorCode::AuthRequired,
            ErrorCode::AuthRequired.description(),
        )
    }

    /// Invalid credentials or token
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Token past its expiry window
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, ErrorCode::AuthExpired.description())
    }

    /// Token kind does not match the verification path
    #[must_use]
    pub fn wrong_token_type() -> Self {
        Self::new(
            ErrorCode::WrongTokenType,
            ErrorCode::WrongTokenType.description(),
        )
    }

    /// Token subject no longer exists in its collection
    #[must_use]
    pub fn principal_not_found() -> Self {
        Self::new(
            ErrorCode::PrincipalNotFound,
            ErrorCode::PrincipalNotFound.description(),
        )
    }

    /// Principal exists but has been deactivated
    #[must_use]
    pub fn principal_inactive() -> Self {
        Self::new(
            ErrorCode::PrincipalInactive,
            ErrorCode::PrincipalInactive.description(),
        )
    }

    /// Role or permission check failed
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// JSON body for error responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always false for errors
    pub success: bool,
    /// Caller-facing message
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();

        // Internal failure detail never reaches callers in release builds;
        // the full chain goes to the log instead.
        let message = if self.code.is_internal() {
            tracing::error!(code = ?self.code, error = %self.message, "request failed");
            if cfg!(debug_assertions) {
                self.message
            } else {
                self.code.description().to_owned()
            }
        } else {
            self.message
        };

        let body = ErrorBody {
            success: false,
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Conversion from `anyhow::Error` (database layer) to `AppError`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

/// Conversion from raw sqlx errors, classifying unique-index violations
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        if is_unique_violation(&error) {
            return Self::conflict("A record with this identifier already exists");
        }
        Self::new(ErrorCode::DatabaseError, error.to_string())
    }
}

/// Check whether a sqlx error is a unique-constraint violation
#[must_use]
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(
            ErrorCode::AuthRequired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::AuthExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::ResourceNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        // Conflicts report 400 by this API's convention, not 409
        assert_eq!(ErrorCode::Conflict.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_convenience_constructors() {
        let err = AppError::conflict("email already exists");
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "email already exists");

        let err = AppError::not_found("Project");
        assert_eq!(err.code, ErrorCode::ResourceNotFound);
        assert_eq!(err.message, "Project not found");
    }

    #[test]
    fn test_auth_errors_are_distinct() {
        assert_ne!(
            AppError::auth_expired().code,
            AppError::auth_required().code
        );
        assert_ne!(
            AppError::wrong_token_type().code,
            AppError::principal_inactive().code
        );
    }
}
