//! # Validation Module
//!
//! Input validation for order requests and CRUD payloads.
//!
//! Validation here rejects malformed shape; pricing shape is deliberately
//! NOT validated — out-of-range discounts are clamped by the normalizer,
//! never rejected (lenient on pricing, strict on identifiers).

use crate::error::ValidationError;
use crate::types::OrderLine;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates an entity identifier.
///
/// ## Rules
/// - Must not be empty
/// - Maximum 64 characters
///
/// Historical data stored ids in more than one textual form, so no format
/// beyond non-emptiness is enforced.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 64,
        });
    }

    Ok(())
}

/// Validates an order's state code.
///
/// ## Rules
/// - May be blank (the code generator maps blank to "na")
/// - Otherwise alphabetic, at most 2 characters
pub fn validate_state_code(state: &str) -> ValidationResult<()> {
    let state = state.trim();
    if state.is_empty() {
        return Ok(());
    }

    if state.len() > 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "state".to_string(),
            reason: "must be a 2-letter state code".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Order Validators
// =============================================================================

/// Validates the shape of an order's line list.
///
/// ## Rules
/// - At least one line
/// - Every line has a product id and a positive quantity
pub fn validate_lines(lines: &[OrderLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        });
    }

    for line in lines {
        validate_id("product_id", &line.product_id)?;
        if line.quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Forecast Validators
// =============================================================================

/// Validates a forecast year.
pub fn validate_forecast_year(year: i32) -> ValidationResult<()> {
    if !(2020..=2050).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field: "year".to_string(),
            min: 2020,
            max: 2050,
        });
    }
    Ok(())
}

/// Validates a forecast month.
pub fn validate_forecast_month(month: i32) -> ValidationResult<()> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, quantity: i64) -> OrderLine {
        OrderLine {
            product_id: product_id.to_string(),
            quantity,
            price: 100.0,
            product_name: None,
            discount_pct: None,
            discounted_price: None,
        }
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("dealer_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        // Raw hex ids from historical writes are accepted too
        assert!(validate_id("dealer_id", "60c72b2f9b1e8d001c8e4f3a").is_ok());
        assert!(validate_id("dealer_id", "").is_err());
        assert!(validate_id("dealer_id", "   ").is_err());
        assert!(validate_id("dealer_id", &"a".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_state_code() {
        assert!(validate_state_code("MH").is_ok());
        assert!(validate_state_code("ap").is_ok());
        assert!(validate_state_code("").is_ok());
        assert!(validate_state_code("MAH").is_err());
        assert!(validate_state_code("M1").is_err());
    }

    #[test]
    fn test_validate_lines() {
        assert!(validate_lines(&[line("p-1", 2)]).is_ok());
        assert!(validate_lines(&[]).is_err());
        assert!(validate_lines(&[line("", 2)]).is_err());
        assert!(validate_lines(&[line("p-1", 0)]).is_err());
        assert!(validate_lines(&[line("p-1", -3)]).is_err());
    }

    #[test]
    fn test_validate_forecast_bounds() {
        assert!(validate_forecast_year(2026).is_ok());
        assert!(validate_forecast_year(2019).is_err());
        assert!(validate_forecast_month(12).is_ok());
        assert!(validate_forecast_month(0).is_err());
        assert!(validate_forecast_month(13).is_err());
    }
}
