//! # API Error Type
//!
//! Unified error type for RPC handlers.
//!
//! ## Error Flow
//! ```text
//! handler
//!   ├── DbError::NotFound        ──┐
//!   ├── CoreError::OpenSession.. ──┼──► ApiError { code, message }
//!   └── ValidationError          ──┘         │
//!                                            ▼
//!                               HTTP status + JSON body:
//!                               { "code": "NOT_FOUND", "message": "..." }
//! ```
//!
//! The original system set HTTP status codes ad hoc; here every error
//! variant maps to exactly one status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use bistro_core::{CoreError, ValidationError};
use bistro_db::DbError;

/// API error returned from RPC handlers.
///
/// Serialized for the client as:
/// ```json
/// { "code": "NOT_FOUND", "message": "POS Invoice not found: INV-1" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Login or token verification failed (401)
    AuthFailed,

    /// Device header missing, unknown, or disabled (403)
    DeviceForbidden,

    /// State conflict, e.g. double open/close (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::AuthFailed => StatusCode::UNAUTHORIZED,
            ErrorCode::DeviceForbidden => StatusCode::FORBIDDEN,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::AuthFailed, message)
    }

    /// Creates a device guard error.
    pub fn device(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::DeviceForbidden, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        (status, Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::not_found(format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Hashing(e) => {
                tracing::error!("Credential hashing failed: {}", e);
                ApiError::internal("Credential processing failed")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UserNotFound => ApiError::auth(err.to_string()),
            CoreError::SessionNotFound(_)
            | CoreError::InvoiceNotFound(_)
            | CoreError::InvoiceItemNotFound(_)
            | CoreError::ProfileNotFound(_) => ApiError::not_found(err.to_string()),
            CoreError::OpenSessionExists { .. } | CoreError::SessionNotOpen { .. } => {
                ApiError::new(ErrorCode::Conflict, err.to_string())
            }
            CoreError::CustomerRequired | CoreError::NoItemsProvided => {
                ApiError::validation(err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::AuthFailed.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::DeviceForbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::Conflict.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::CustomerRequired.into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err: ApiError = CoreError::UserNotFound.into();
        assert_eq!(err.code, ErrorCode::AuthFailed);

        let err: ApiError = CoreError::InvoiceNotFound("INV-1".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("POS Session", "S-1").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "POS Session not found: S-1");
    }
}
