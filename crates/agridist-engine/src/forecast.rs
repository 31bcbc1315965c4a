//! # Forecast Service
//!
//! Monthly per-salesman sales forecasts: whole-document upserts keyed by
//! (salesman, year, month), with caller-scoped listing through the same
//! identity resolver the order reads use.

use tracing::info;
use uuid::Uuid;

use agridist_core::{validation, CoreError, Forecast, ForecastLine};
use agridist_db::Database;

use crate::enrich::enrich_forecast;
use crate::error::{EngineError, EngineResult};
use crate::identity::{IdentityResolver, Visibility};

/// Forecast submission and read service.
#[derive(Clone)]
pub struct ForecastService {
    db: Database,
    resolver: IdentityResolver,
}

impl ForecastService {
    /// Creates a forecast service over the given database handle.
    pub fn new(db: Database) -> Self {
        let resolver = IdentityResolver::new(&db);
        ForecastService { db, resolver }
    }

    /// Submits (or resubmits) a salesman's forecast for one month. A
    /// resubmission replaces the previous line list for that month.
    pub async fn submit(
        &self,
        salesman_id: &str,
        year: i32,
        month: i32,
        lines: Vec<ForecastLine>,
    ) -> EngineResult<Forecast> {
        validation::validate_id("salesman_id", salesman_id).map_err(CoreError::from)?;
        validation::validate_forecast_year(year).map_err(CoreError::from)?;
        validation::validate_forecast_month(month).map_err(CoreError::from)?;

        self.db
            .identities()
            .salesman_by_id(salesman_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Salesman", salesman_id))?;

        let forecast = self
            .db
            .forecasts()
            .upsert(&Uuid::new_v4().to_string(), salesman_id, year, month, &lines)
            .await?;
        info!(salesman_id = %salesman_id, year, month, lines = forecast.lines.len(),
              "Forecast submitted");

        enrich_forecast(&self.db, forecast).await
    }

    /// Lists the forecasts visible to a caller identified by uid and/or
    /// email. Guests see an empty list.
    pub async fn list_for_caller(
        &self,
        uid: Option<&str>,
        email: Option<&str>,
    ) -> EngineResult<Vec<Forecast>> {
        let caller = self.resolver.resolve(uid, email).await?;
        let forecasts = match self.resolver.visibility(&caller).await? {
            Visibility::All => self.db.forecasts().list_all().await?,
            Visibility::Team(ids) => self.db.forecasts().list_by_salesmen(&ids).await?,
            Visibility::Nothing => Vec::new(),
        };

        let mut enriched = Vec::with_capacity(forecasts.len());
        for forecast in forecasts {
            enriched.push(enrich_forecast(&self.db, forecast).await?);
        }
        Ok(enriched)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
