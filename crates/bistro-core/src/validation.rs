//! # Validation Module
//!
//! Input validation applied at the RPC boundary, before business logic
//! or SQL runs. The database constraints (NOT NULL, UNIQUE, FK) remain
//! the last line of defense.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required string field: non-empty after trimming.
/// Returns the trimmed value.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Validates an item code.
///
/// ## Rules
/// - Must not be empty
/// - At most 140 characters
/// - Letters, numbers, spaces, hyphens, underscores
pub fn validate_item_code(code: &str) -> ValidationResult<String> {
    let code = validate_required("item_code", code)?;

    if code.len() > 140 {
        return Err(ValidationError::TooLong {
            field: "item_code".to_string(),
            max: 140,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "item_code".to_string(),
            reason: "must contain only letters, numbers, spaces, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(code)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// Fractional quantities are allowed (0.5 kg); zero is allowed because
/// the terminal sends qty 0 to blank a row before re-entry. Negative or
/// non-finite values are rejected.
pub fn validate_qty(qty: f64) -> ValidationResult<()> {
    if !qty.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "qty".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if qty < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "qty".to_string(),
        });
    }
    Ok(())
}

/// Validates a major-unit monetary amount arriving from the client.
/// Must be finite and non-negative.
pub fn validate_amount(field: &str, amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if amount < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a payment amount: finite and strictly positive.
pub fn validate_payment_amount(amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "payment amount".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if amount <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }
    Ok(())
}

/// Validates a guest count.
pub fn validate_guest_count(guests: i64) -> ValidationResult<()> {
    if !(0..=1000).contains(&guests) {
        return Err(ValidationError::OutOfRange {
            field: "number_of_guests".to_string(),
            min: 0,
            max: 1000,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
