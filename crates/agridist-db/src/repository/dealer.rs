//! # Dealer Repository
//!
//! Storage for dealer records. Each dealer belongs to exactly one salesman;
//! the ownership and state checks that gate order creation read through
//! here.

use sqlx::SqlitePool;
use tracing::debug;

use agridist_core::Dealer;

use crate::error::DbResult;

const DEALER_COLS: &str =
    "id, name, phone, state, salesman_id, credit_limit, created_at, updated_at";

/// Repository for dealer records.
#[derive(Debug, Clone)]
pub struct DealerRepository {
    pool: SqlitePool,
}

impl DealerRepository {
    /// Creates a new DealerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DealerRepository { pool }
    }

    /// Inserts a dealer record.
    pub async fn insert(&self, dealer: &Dealer) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO dealers
                (id, name, phone, state, salesman_id, credit_limit,
                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&dealer.id)
        .bind(&dealer.name)
        .bind(&dealer.phone)
        .bind(&dealer.state)
        .bind(&dealer.salesman_id)
        .bind(dealer.credit_limit)
        .bind(dealer.created_at)
        .bind(dealer.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(dealer_id = %dealer.id, salesman_id = %dealer.salesman_id, "Inserted dealer");
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Dealer>> {
        let dealer: Option<Dealer> =
            sqlx::query_as(&format!("SELECT {DEALER_COLS} FROM dealers WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(dealer)
    }

    /// All dealers owned by one salesman.
    pub async fn list_by_salesman(&self, salesman_id: &str) -> DbResult<Vec<Dealer>> {
        let dealers: Vec<Dealer> = sqlx::query_as(&format!(
            "SELECT {DEALER_COLS} FROM dealers WHERE salesman_id = ?1 ORDER BY name"
        ))
        .bind(salesman_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(dealers)
    }

    /// All dealers owned by any salesman in the given set. Empty input
    /// returns an empty list without touching the database.
    pub async fn list_by_salesmen(&self, salesman_ids: &[String]) -> DbResult<Vec<Dealer>> {
        if salesman_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> =
            (1..=salesman_ids.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "SELECT {DEALER_COLS} FROM dealers WHERE salesman_id IN ({}) ORDER BY name",
            placeholders.join(", ")
        );

        let mut query = sqlx::query_as::<_, Dealer>(&sql);
        for id in salesman_ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn list_all(&self) -> DbResult<Vec<Dealer>> {
        let dealers: Vec<Dealer> =
            sqlx::query_as(&format!("SELECT {DEALER_COLS} FROM dealers ORDER BY name"))
                .fetch_all(&self.pool)
                .await?;

        Ok(dealers)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
