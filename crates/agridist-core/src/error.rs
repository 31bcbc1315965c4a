//! # Error Types
//!
//! Domain-specific error types for agridist-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  agridist-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  agridist-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  agridist-engine errors (separate crate)                               │
//! │  └── EngineError      - What API callers see                           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, states, fields)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business rule errors.
///
/// Discount normalization never produces one of these — out-of-range
/// discounts are clamped, not rejected. These cover the order-shape checks
/// that run before an order is accepted.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The dealer on the order is not owned by the ordering salesman.
    #[error("Dealer {dealer_id} is not under salesman {salesman_id}")]
    DealerNotUnderSalesman {
        dealer_id: String,
        salesman_id: String,
    },

    /// Dealer and salesman are registered in different states.
    #[error("Dealer state {dealer_state:?} does not match salesman state {salesman_state:?}")]
    StateMismatch {
        dealer_state: Option<String>,
        salesman_state: Option<String>,
    },

    /// An order must carry at least one line.
    #[error("Order has no lines")]
    EmptyOrder,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before business logic runs. Surfaced to the
/// caller with enough detail to correct the request.
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

    /// Invalid format (malformed identifier, bad state code, ...).
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
        let err = CoreError::DealerNotUnderSalesman {
            dealer_id: "d-1".to_string(),
            salesman_id: "s-1".to_string(),
        };
        assert_eq!(err.to_string(), "Dealer d-1 is not under salesman s-1");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "dealer_id".to_string(),
        };
        assert_eq!(err.to_string(), "dealer_id is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
