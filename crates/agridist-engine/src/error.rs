//! # Engine Error Types
//!
//! The caller-facing error taxonomy:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invalid         — bad input, caller can correct the request           │
//! │  NotFound        — referenced dealer/salesman/order absent             │
//! │  CodeAllocation  — counter unreachable or timed out; order creation    │
//! │                    ABORTS (an order is never stored without a code)    │
//! │  Db              — any other storage failure                           │
//! │                                                                         │
//! │  NOT errors: identity resolution misses (guest scope) and              │
//! │  notification failures (warn-logged and swallowed).                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use agridist_core::CoreError;
use agridist_db::DbError;

/// Engine operation errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Request rejected by a validation or business rule.
    #[error("Invalid request: {0}")]
    Invalid(#[from] CoreError),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The order-code counter could not be incremented. Order creation must
    /// abort; never retried with a fresh read.
    #[error("Order code allocation failed: {0}")]
    CodeAllocation(String),

    /// Storage failure other than not-found.
    #[error(transparent)]
    Db(DbError),
}

impl EngineError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => EngineError::NotFound { entity, id },
            other => EngineError::Db(other),
        }
    }
}

impl From<agridist_core::ValidationError> for EngineError {
    fn from(err: agridist_core::ValidationError) -> Self {
        EngineError::Invalid(CoreError::Validation(err))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_not_found_surfaces_as_engine_not_found() {
        let err: EngineError = DbError::not_found("dealer", "d-9").into();
        assert!(matches!(err, EngineError::NotFound { .. }));
        assert_eq!(err.to_string(), "dealer not found: d-9");
    }

    #[test]
    fn test_other_db_errors_stay_db() {
        let err: EngineError = DbError::PoolExhausted.into();
        assert!(matches!(err, EngineError::Db(_)));
    }
}
