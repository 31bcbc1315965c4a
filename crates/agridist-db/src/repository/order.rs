//! # Order Repository
//!
//! Storage for orders. The `lines` column is a JSON document and may hold
//! two shapes:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Current rows:   [ {line}, {line}, ... ]      (JSON array)              │
//! │  Historic rows:  { product_id, quantity, .. } (single JSON object)     │
//! │                                                                         │
//! │  Every read parses into StoredLines and upgrades to the current        │
//! │  multi-line shape before the order leaves this module. Stored rows     │
//! │  are never rewritten just to modernize their shape.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orders are only ever inserted WITH an order code; the code column is
//! NOT NULL UNIQUE and immutable after insert.

use sqlx::SqlitePool;
use tracing::debug;

use agridist_core::{DiscountStatus, Order, OrderLine, OrderStatus, StoredLines};

use crate::error::DbResult;

// =============================================================================
// Row Type
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    state: String,
    salesman_id: String,
    dealer_id: String,
    lines: String,
    total_price: f64,
    discount: f64,
    discounted_total: f64,
    status: OrderStatus,
    discount_status: DiscountStatus,
    order_code: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl OrderRow {
    /// Parses the line document, upgrading the deprecated single-line shape.
    fn into_order(self) -> DbResult<Order> {
        let stored: StoredLines = serde_json::from_str(&self.lines)?;
        Ok(Order {
            id: self.id,
            state: self.state,
            salesman_id: self.salesman_id,
            dealer_id: self.dealer_id,
            lines: stored.upgrade(),
            total_price: self.total_price,
            discount: self.discount,
            discounted_total: self.discounted_total,
            status: self.status,
            discount_status: self.discount_status,
            order_code: self.order_code,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const ORDER_COLS: &str = "id, state, salesman_id, dealer_id, lines, total_price, \
                          discount, discounted_total, status, discount_status, \
                          order_code, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for order records.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts a fully-formed order. The caller must already have
    /// normalized the lines and allocated the order code.
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders
                (id, state, salesman_id, dealer_id, lines, total_price, discount,
                 discounted_total, status, discount_status, order_code,
                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&order.id)
        .bind(&order.state)
        .bind(&order.salesman_id)
        .bind(&order.dealer_id)
        .bind(serde_json::to_string(&order.lines)?)
        .bind(order.total_price)
        .bind(order.discount)
        .bind(order.discounted_total)
        .bind(order.status)
        .bind(order.discount_status)
        .bind(&order.order_code)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(order_id = %order.id, order_code = %order.order_code, "Inserted order");
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLS} FROM orders WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(OrderRow::into_order).transpose()
    }

    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Orders placed by any salesman in the given set, newest first. Empty
    /// input returns an empty list without touching the database.
    pub async fn list_by_salesmen(&self, salesman_ids: &[String]) -> DbResult<Vec<Order>> {
        if salesman_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> =
            (1..=salesman_ids.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "SELECT {ORDER_COLS} FROM orders WHERE salesman_id IN ({}) \
             ORDER BY created_at DESC",
            placeholders.join(", ")
        );

        let mut query = sqlx::query_as::<_, OrderRow>(&sql);
        for id in salesman_ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Replaces the normalized line document and its aggregates. Status and
    /// order code are deliberately not touched here.
    pub async fn update_lines(
        &self,
        id: &str,
        lines: &[OrderLine],
        total_price: f64,
        discount: f64,
        discounted_total: f64,
        discount_status: DiscountStatus,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET lines = ?2, total_price = ?3, discount = ?4,
                discounted_total = ?5, discount_status = ?6, updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(serde_json::to_string(lines)?)
        .bind(total_price)
        .bind(discount)
        .bind(discounted_total)
        .bind(discount_status)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_status(&self, id: &str, status: OrderStatus) -> DbResult<bool> {
        let result =
            sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(status)
                .bind(chrono::Utc::now())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_discount_status(
        &self,
        id: &str,
        discount_status: DiscountStatus,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE orders SET discount_status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(discount_status)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Administrative: removes every order. External reset tooling only.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM orders").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
