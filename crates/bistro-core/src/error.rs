//! # Error Types
//!
//! Domain-specific error types for bistro-core.
//!
//! ## Error Hierarchy
//! ```text
//! bistro-core errors (this file)
//! ├── CoreError        - Business rule violations
//! └── ValidationError  - Input validation failures
//!
//! bistro-db errors (separate crate)
//! └── DbError          - Database operation failures
//!
//! pos-server errors (in app)
//! └── ApiError         - What the POS client sees (serialized)
//!
//! Flow: ValidationError → CoreError → DbError → ApiError → client
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No cashier matches the given code, or the account is disabled.
    #[error("User Not Found")]
    UserNotFound,

    /// POS session cannot be found.
    #[error("POS Session {0} not found")]
    SessionNotFound(String),

    /// The cashier already has an open session for this profile.
    #[error("There is already an open session for this user and POS Profile")]
    OpenSessionExists { cashier: String, profile: String },

    /// The session is not open, so it cannot be closed or written to.
    #[error("Session {session} is not open (status: {status})")]
    SessionNotOpen { session: String, status: String },

    /// Invoice cannot be found.
    #[error("POS Invoice {0} not found")]
    InvoiceNotFound(String),

    /// Invoice item row cannot be found.
    #[error("POS Invoice Item not found: {0}")]
    InvoiceItemNotFound(String),

    /// Creating an invoice requires a customer.
    #[error("Customer is required when creating a new invoice")]
    CustomerRequired,

    /// Bulk upsert was called with an empty item list.
    #[error("No items provided")]
    NoItemsProvided,

    /// POS profile cannot be found or is disabled.
    #[error("POS Profile {0} not found")]
    ProfileNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when client input doesn't meet requirements; they are used
/// for early validation before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (bad characters, non-finite number, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::SessionNotOpen {
            session: "POS-SES-0001".to_string(),
            status: "closed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Session POS-SES-0001 is not open (status: closed)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "item_code".to_string(),
        };
        assert_eq!(err.to_string(), "item_code is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
