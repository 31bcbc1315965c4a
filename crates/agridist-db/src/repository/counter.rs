//! # Order Counter Repository
//!
//! The keyed sequence counters behind order codes: one row per
//! (fiscal year, state) pair.
//!
//! ## The One Mandatory Atomicity Point
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Concurrent order creation, same fiscal year + state:                   │
//! │                                                                         │
//! │  Task A ──► next_seq("2025-26", "mh") ──► 7                            │
//! │  Task B ──► next_seq("2025-26", "mh") ──► 8                            │
//! │                                                                         │
//! │  The increment is ONE statement executed by the database:              │
//! │    INSERT .. ON CONFLICT .. DO UPDATE SET seq = seq + 1 RETURNING seq  │
//! │                                                                         │
//! │  A read-then-write from the caller would hand both tasks the same      │
//! │  value and mint duplicate order codes. Never do that here.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Counters are monotonically incremented and never reset except through
//! the administrative [`CounterRepository::reset`] escape hatch.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for order-code sequence counters.
#[derive(Debug, Clone)]
pub struct CounterRepository {
    pool: SqlitePool,
}

impl CounterRepository {
    /// Creates a new CounterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CounterRepository { pool }
    }

    /// Atomically increments and returns the counter for a
    /// (fiscal year, state) key, creating the row on first use.
    ///
    /// The first call for a key returns 1; the visible order-code tail is
    /// `seq − 1`, so the displayed series starts at 0000.
    pub async fn next_seq(&self, fiscal_year: &str, state: &str) -> DbResult<i64> {
        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO order_counters (fiscal_year, state, seq)
            VALUES (?1, ?2, 1)
            ON CONFLICT (fiscal_year, state)
            DO UPDATE SET seq = seq + 1
            RETURNING seq
            "#,
        )
        .bind(fiscal_year)
        .bind(state)
        .fetch_one(&self.pool)
        .await?;

        debug!(fiscal_year = %fiscal_year, state = %state, seq, "Allocated order sequence");
        Ok(seq)
    }

    /// Returns the current counter value without incrementing, if the key
    /// exists.
    pub async fn current(&self, fiscal_year: &str, state: &str) -> DbResult<Option<i64>> {
        let seq: Option<i64> = sqlx::query_scalar(
            "SELECT seq FROM order_counters WHERE fiscal_year = ?1 AND state = ?2",
        )
        .bind(fiscal_year)
        .bind(state)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seq)
    }

    /// Administrative reset of a single counter. Not part of the engine
    /// API; external reset tooling only.
    pub async fn reset(&self, fiscal_year: &str, state: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM order_counters WHERE fiscal_year = ?1 AND state = ?2")
            .bind(fiscal_year)
            .bind(state)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_allocation_returns_one() {
        let db = db().await;
        let seq = db.counters().next_seq("2025-26", "mh").await.unwrap();
        assert_eq!(seq, 1);
    }

    #[tokio::test]
    async fn test_sequence_is_contiguous() {
        let db = db().await;
        let counters = db.counters();
        for expected in 1..=5 {
            let seq = counters.next_seq("2025-26", "mh").await.unwrap();
            assert_eq!(seq, expected);
        }
    }

    #[tokio::test]
    async fn test_states_have_independent_sequences() {
        let db = db().await;
        let counters = db.counters();

        assert_eq!(counters.next_seq("2025-26", "mh").await.unwrap(), 1);
        assert_eq!(counters.next_seq("2025-26", "mh").await.unwrap(), 2);
        // A different state in the same fiscal year starts from scratch
        assert_eq!(counters.next_seq("2025-26", "ap").await.unwrap(), 1);
        // As does the same state in a different fiscal year
        assert_eq!(counters.next_seq("2024-25", "mh").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_current_does_not_increment() {
        let db = db().await;
        let counters = db.counters();

        assert_eq!(counters.current("2025-26", "mh").await.unwrap(), None);
        counters.next_seq("2025-26", "mh").await.unwrap();
        assert_eq!(counters.current("2025-26", "mh").await.unwrap(), Some(1));
        assert_eq!(counters.current("2025-26", "mh").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_reset_starts_series_over() {
        let db = db().await;
        let counters = db.counters();

        counters.next_seq("2025-26", "mh").await.unwrap();
        counters.next_seq("2025-26", "mh").await.unwrap();
        counters.reset("2025-26", "mh").await.unwrap();
        assert_eq!(counters.next_seq("2025-26", "mh").await.unwrap(), 1);
    }
}
