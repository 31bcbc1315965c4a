//! # Forecast Repository
//!
//! Storage for monthly per-salesman sales forecasts. A forecast is a whole
//! document keyed by (salesman, year, month): submitting again for the same
//! month replaces the previous line list.

use sqlx::SqlitePool;
use tracing::debug;

use agridist_core::{Forecast, ForecastLine};

use crate::error::DbResult;

#[derive(Debug, sqlx::FromRow)]
struct ForecastRow {
    id: String,
    salesman_id: String,
    year: i32,
    month: i32,
    lines: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl ForecastRow {
    fn into_forecast(self) -> DbResult<Forecast> {
        Ok(Forecast {
            id: self.id,
            salesman_id: self.salesman_id,
            year: self.year,
            month: self.month,
            lines: serde_json::from_str(&self.lines)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const FORECAST_COLS: &str = "id, salesman_id, year, month, lines, created_at, updated_at";

/// Repository for forecast records.
#[derive(Debug, Clone)]
pub struct ForecastRepository {
    pool: SqlitePool,
}

impl ForecastRepository {
    /// Creates a new ForecastRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ForecastRepository { pool }
    }

    /// Inserts or replaces the forecast for (salesman, year, month). The
    /// original id and created_at survive a replacement.
    pub async fn upsert(
        &self,
        id: &str,
        salesman_id: &str,
        year: i32,
        month: i32,
        lines: &[ForecastLine],
    ) -> DbResult<Forecast> {
        let now = chrono::Utc::now();
        let row: ForecastRow = sqlx::query_as(
            r#"
            INSERT INTO forecasts (id, salesman_id, year, month, lines, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT (salesman_id, year, month)
            DO UPDATE SET lines = excluded.lines, updated_at = excluded.updated_at
            RETURNING id, salesman_id, year, month, lines, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(salesman_id)
        .bind(year)
        .bind(month)
        .bind(serde_json::to_string(lines)?)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!(salesman_id = %salesman_id, year, month, "Upserted forecast");
        row.into_forecast()
    }

    pub async fn get(
        &self,
        salesman_id: &str,
        year: i32,
        month: i32,
    ) -> DbResult<Option<Forecast>> {
        let row: Option<ForecastRow> = sqlx::query_as(&format!(
            "SELECT {FORECAST_COLS} FROM forecasts \
             WHERE salesman_id = ?1 AND year = ?2 AND month = ?3"
        ))
        .bind(salesman_id)
        .bind(year)
        .bind(month)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ForecastRow::into_forecast).transpose()
    }

    /// Forecasts submitted by any salesman in the given set, newest period
    /// first. Empty input returns an empty list.
    pub async fn list_by_salesmen(&self, salesman_ids: &[String]) -> DbResult<Vec<Forecast>> {
        if salesman_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> =
            (1..=salesman_ids.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "SELECT {FORECAST_COLS} FROM forecasts WHERE salesman_id IN ({}) \
             ORDER BY year DESC, month DESC",
            placeholders.join(", ")
        );

        let mut query = sqlx::query_as::<_, ForecastRow>(&sql);
        for id in salesman_ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(ForecastRow::into_forecast).collect()
    }

    pub async fn list_all(&self) -> DbResult<Vec<Forecast>> {
        let rows: Vec<ForecastRow> = sqlx::query_as(&format!(
            "SELECT {FORECAST_COLS} FROM forecasts ORDER BY year DESC, month DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ForecastRow::into_forecast).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
