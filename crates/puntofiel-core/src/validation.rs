//! # Validation Module
//!
//! Input validation utilities for PuntoFiel use cases.
//!
//! ## Validation Strategy
//! Every use case runs these guard clauses BEFORE touching a repository, so
//! invalid input never causes a network call and every rejection carries a
//! specific, user-displayable message. The backend schema enforces the same
//! rules again (NOT NULL, CHECK, foreign keys) as the last line of defense.
//!
//! ## Usage
//! ```rust
//! use puntofiel_core::validation::{validate_name, validate_positive};
//!
//! validate_name("nombre", "Café Central").unwrap();
//! validate_positive("puntos requeridos", 100).unwrap();
//! ```

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::{MIN_NAME_CHARS, MIN_PASSWORD_CHARS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier & String Validators
// =============================================================================

/// Validates that a foreign-key style identifier is present.
///
/// ## Rules
/// - Must not be empty or whitespace-only
///
/// The `field` label is the Spanish name shown in the error message.
pub fn validate_id(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates a human-facing name or title.
///
/// ## Rules
/// - Must not be empty
/// - Must be at least 3 characters after trimming
///
/// ## Example
/// ```rust
/// use puntofiel_core::validation::validate_name;
///
/// assert!(validate_name("nombre", "Café Central").is_ok());
/// assert!(validate_name("nombre", "ab").is_err());
/// assert!(validate_name("nombre", "   ").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::too_short(field, MIN_NAME_CHARS));
    }

    Ok(())
}

/// Validates an employee password.
///
/// ## Rules
/// - At least 8 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_CHARS,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that a numeric field is strictly positive.
///
/// ## Example
/// ```rust
/// use puntofiel_core::validation::validate_positive;
///
/// assert!(validate_positive("puntos requeridos", 100).is_ok());
/// assert!(validate_positive("puntos requeridos", 0).is_err());
/// assert!(validate_positive("puntos requeridos", -5).is_err());
/// ```
pub fn validate_positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates that a numeric field is zero or greater.
///
/// Ticket costs may legitimately be zero (free entry raffles).
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a purchase amount in cents.
///
/// ## Rules
/// - Must be strictly positive; a zero or negative purchase earns nothing
///   and must never reach the backend
pub fn validate_purchase_amount(amount_cents: i64) -> ValidationResult<()> {
    validate_positive("monto de la compra", amount_cents)
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates that an end date is strictly after a start date.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use puntofiel_core::validation::validate_date_order;
///
/// let now = Utc::now();
/// assert!(validate_date_order(now, now + Duration::days(7)).is_ok());
/// assert!(validate_date_order(now, now).is_err());
/// ```
pub fn validate_date_order(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> ValidationResult<()> {
    if ends_at <= starts_at {
        return Err(ValidationError::DateOrder);
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("negocio", "b1").is_ok());
        assert!(validate_id("negocio", "").is_err());
        assert!(validate_id("negocio", "   ").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("nombre", "Café Central").is_ok());
        // Accented chars count as characters, not bytes
        assert!(validate_name("nombre", "ñño").is_ok());

        assert!(validate_name("nombre", "").is_err());
        assert!(validate_name("nombre", "ab").is_err());
        assert_eq!(
            validate_name("nombre", "ab").unwrap_err().to_string(),
            "El nombre debe tener al menos 3 caracteres"
        );
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secreta1").is_ok());
        assert!(validate_password("corta").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("puntos requeridos", 1).is_ok());
        assert!(validate_positive("puntos requeridos", 0).is_err());
        assert!(validate_positive("puntos requeridos", -1).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("costo del boleto", 0).is_ok());
        assert!(validate_non_negative("costo del boleto", 10).is_ok());
        assert!(validate_non_negative("costo del boleto", -1).is_err());
    }

    #[test]
    fn test_validate_purchase_amount() {
        assert!(validate_purchase_amount(500).is_ok());
        assert!(validate_purchase_amount(0).is_err());
        assert!(validate_purchase_amount(-100).is_err());
    }

    #[test]
    fn test_validate_date_order() {
        let now = Utc::now();
        assert!(validate_date_order(now, now + Duration::hours(1)).is_ok());
        assert!(validate_date_order(now, now).is_err());
        assert!(validate_date_order(now, now - Duration::hours(1)).is_err());
    }
}
