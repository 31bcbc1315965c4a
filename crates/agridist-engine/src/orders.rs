//! # Order Service
//!
//! Order ingestion and reads.
//!
//! ## Create Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate input                                                         │
//! │    → salesman & dealer must exist                                       │
//! │    → dealer owned by salesman, states must match                        │
//! │  normalize discounts (clamp, derive, aggregate, status policy)         │
//! │  allocate order code (bounded timeout; failure ABORTS the create)      │
//! │  persist                                                                │
//! │  enrich + spawn notification (fire-and-forget)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The code allocation step is deliberately strict: on counter failure or
//! timeout the create fails outright. It is never retried with a fresh read
//! and an order is never persisted without a code.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use agridist_core::{
    discount, fiscal, validation, CoreError, DiscountStatus, Order, OrderLine, OrderStatus,
};
use agridist_db::Database;

use crate::config::AppConfig;
use crate::enrich::{enrich_order, enrich_orders, EnrichedOrder};
use crate::error::{EngineError, EngineResult};
use crate::identity::{IdentityResolver, Visibility};
use crate::notify::OrderNotifier;

// =============================================================================
// Request Shape
// =============================================================================

/// An incoming create-order request.
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    /// 2-letter state code scoping the order-code sequence. May be blank.
    pub state: String,
    pub salesman_id: String,
    pub dealer_id: String,
    pub lines: Vec<OrderLine>,
    /// Caller-requested discount status; see the normalizer's policy.
    pub requested_discount_status: Option<DiscountStatus>,
}

// =============================================================================
// Service
// =============================================================================

/// Order ingestion and read service.
#[derive(Clone)]
pub struct OrderService {
    db: Database,
    resolver: IdentityResolver,
    notifier: Arc<dyn OrderNotifier>,
    store_timeout: Duration,
}

impl OrderService {
    /// Creates an order service over the given database handle.
    pub fn new(db: Database, notifier: Arc<dyn OrderNotifier>, config: &AppConfig) -> Self {
        let resolver = IdentityResolver::new(&db);
        OrderService {
            db,
            resolver,
            notifier,
            store_timeout: config.store_timeout,
        }
    }

    /// Creates an order: validates, normalizes discounts, stamps a code,
    /// persists, and fires the notification hook.
    pub async fn create_order(&self, req: CreateOrderRequest) -> EngineResult<EnrichedOrder> {
        validation::validate_id("salesman_id", &req.salesman_id).map_err(CoreError::from)?;
        validation::validate_id("dealer_id", &req.dealer_id).map_err(CoreError::from)?;
        validation::validate_state_code(&req.state).map_err(CoreError::from)?;
        validation::validate_lines(&req.lines).map_err(CoreError::from)?;

        let salesman = self
            .db
            .identities()
            .salesman_by_id(&req.salesman_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Salesman", &req.salesman_id))?;
        let dealer = self
            .db
            .dealers()
            .get_by_id(&req.dealer_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Dealer", &req.dealer_id))?;

        if dealer.salesman_id != salesman.id {
            return Err(CoreError::DealerNotUnderSalesman {
                dealer_id: dealer.id,
                salesman_id: salesman.id,
            }
            .into());
        }
        if !states_match(dealer.state.as_deref(), salesman.state.as_deref()) {
            return Err(CoreError::StateMismatch {
                dealer_state: dealer.state,
                salesman_state: salesman.state,
            }
            .into());
        }

        let totals = discount::normalize_order(req.lines, req.requested_discount_status);

        let now = Utc::now();
        let fiscal_label = fiscal::fiscal_year_label(now);
        let order_code = self.allocate_code(&fiscal_label, &req.state).await?;

        let order = Order {
            id: Uuid::new_v4().to_string(),
            state: req.state,
            salesman_id: req.salesman_id,
            dealer_id: req.dealer_id,
            lines: totals.lines,
            total_price: totals.total_price,
            discount: totals.discount_pct,
            discounted_total: totals.discounted_total,
            status: OrderStatus::Pending,
            discount_status: totals.discount_status,
            order_code,
            created_at: now,
            updated_at: now,
        };

        self.db.orders().insert(&order).await?;
        info!(order_id = %order.id, order_code = %order.order_code,
              discounted_total = order.discounted_total, "Order created");

        let enriched = enrich_order(&self.db, order).await?;
        self.spawn_notification(enriched.clone());
        Ok(enriched)
    }

    /// Allocates the next order code within the bounded store timeout.
    ///
    /// Timeout or counter failure aborts the create; a retry here could
    /// mint a duplicate code from a stale read.
    async fn allocate_code(&self, fiscal_label: &str, state: &str) -> EngineResult<String> {
        let key = fiscal::state_key(state);
        let seq = timeout(
            self.store_timeout,
            self.db.counters().next_seq(fiscal_label, &key),
        )
        .await
        .map_err(|_| EngineError::CodeAllocation("counter increment timed out".to_string()))?
        .map_err(|err| EngineError::CodeAllocation(err.to_string()))?;

        Ok(fiscal::order_code(fiscal_label, state, seq))
    }

    fn spawn_notification(&self, order: EnrichedOrder) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.order_created(&order).await {
                warn!(order_id = %order.order.id, error = %err, "Order notification failed");
            }
        });
    }

    /// Reads one order, names attached.
    pub async fn get_order(&self, id: &str) -> EngineResult<EnrichedOrder> {
        let order = self
            .db
            .orders()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Order", id))?;
        enrich_order(&self.db, order).await
    }

    /// Lists the orders visible to a caller identified by uid and/or email.
    /// Guests see an empty list.
    pub async fn list_orders(
        &self,
        uid: Option<&str>,
        email: Option<&str>,
    ) -> EngineResult<Vec<EnrichedOrder>> {
        let caller = self.resolver.resolve(uid, email).await?;
        let orders = match self.resolver.visibility(&caller).await? {
            Visibility::All => self.db.orders().list_all().await?,
            Visibility::Team(ids) => self.db.orders().list_by_salesmen(&ids).await?,
            Visibility::Nothing => Vec::new(),
        };
        enrich_orders(&self.db, orders).await
    }

    /// Replaces an order's lines, re-running the full normalization over
    /// the replacement list (no partial updates). The order code is never
    /// touched.
    pub async fn update_order_lines(
        &self,
        id: &str,
        lines: Vec<OrderLine>,
        requested_discount_status: Option<DiscountStatus>,
    ) -> EngineResult<EnrichedOrder> {
        validation::validate_lines(&lines).map_err(CoreError::from)?;

        let totals = discount::normalize_order(lines, requested_discount_status);
        let updated = self
            .db
            .orders()
            .update_lines(
                id,
                &totals.lines,
                totals.total_price,
                totals.discount_pct,
                totals.discounted_total,
                totals.discount_status,
            )
            .await?;
        if !updated {
            return Err(EngineError::not_found("Order", id));
        }

        self.get_order(id).await
    }

    /// Sets an order's fulfillment status (external admin action).
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> EngineResult<()> {
        if !self.db.orders().set_status(id, status).await? {
            return Err(EngineError::not_found("Order", id));
        }
        Ok(())
    }

    /// Sets an order's discount approval status (external approval action).
    pub async fn set_discount_status(
        &self,
        id: &str,
        discount_status: DiscountStatus,
    ) -> EngineResult<()> {
        if !self.db.orders().set_discount_status(id, discount_status).await? {
            return Err(EngineError::not_found("Order", id));
        }
        Ok(())
    }
}

/// Dealer and salesman states match when both are absent or equal ignoring
/// case.
fn states_match(dealer: Option<&str>, salesman: Option<&str>) -> bool {
    match (dealer, salesman) {
        (None, None) => true,
        (Some(d), Some(s)) => d.trim().eq_ignore_ascii_case(s.trim()),
        _ => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{db, dealer, line, salesman, service_over};

    fn request(lines: Vec<OrderLine>) -> CreateOrderRequest {
        CreateOrderRequest {
            state: "MH".to_string(),
            salesman_id: "s-1".to_string(),
            dealer_id: "d-1".to_string(),
            lines,
            requested_discount_status: None,
        }
    }

    async fn seeded() -> (agridist_db::Database, OrderService) {
        let db = db().await;
        db.identities()
            .insert_salesman(&salesman("s-1", "rep@example.com"))
            .await
            .unwrap();
        db.dealers().insert(&dealer("d-1", "s-1")).await.unwrap();
        let service = service_over(&db);
        (db, service)
    }

    #[tokio::test]
    async fn test_discounted_order_pends_approval() {
        let (_db, service) = seeded().await;

        let order = service
            .create_order(request(vec![line(8500.0, Some(10.0), None)]))
            .await
            .unwrap()
            .order;

        assert_eq!(order.total_price, 8500.0);
        assert_eq!(order.discounted_total, 7650.0);
        assert_eq!(order.discount, 10.0);
        assert_eq!(order.lines[0].discounted_price, Some(7650.0));
        assert_eq!(order.discount_status, DiscountStatus::Pending);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.order_code.ends_with("-mh-0000"));
    }

    #[tokio::test]
    async fn test_undiscounted_order_is_auto_approved() {
        let (_db, service) = seeded().await;

        let order = service
            .create_order(request(vec![line(1000.0, None, None)]))
            .await
            .unwrap()
            .order;

        assert_eq!(order.lines[0].discount_pct, Some(0.0));
        assert_eq!(order.lines[0].discounted_price, Some(1000.0));
        assert_eq!(order.discount_status, DiscountStatus::Approved);
    }

    #[tokio::test]
    async fn test_codes_are_sequential_per_state() {
        let (_db, service) = seeded().await;

        for expected_tail in ["0000", "0001", "0002"] {
            let order = service
                .create_order(request(vec![line(100.0, None, None)]))
                .await
                .unwrap()
                .order;
            assert!(order.order_code.ends_with(&format!("-mh-{expected_tail}")));
        }
    }

    #[tokio::test]
    async fn test_concurrent_creates_mint_distinct_contiguous_codes() {
        let (_db, service) = seeded().await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .create_order(request(vec![line(100.0, None, None)]))
                    .await
                    .unwrap()
                    .order
                    .order_code
            }));
        }

        let mut tails: Vec<i64> = Vec::new();
        for handle in handles {
            let code = handle.await.unwrap();
            tails.push(code.rsplit('-').next().unwrap().parse().unwrap());
        }
        tails.sort_unstable();
        assert_eq!(tails, (0..8).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_unknown_dealer_is_not_found() {
        let (_db, service) = seeded().await;

        let mut req = request(vec![line(100.0, None, None)]);
        req.dealer_id = "d-missing".to_string();
        let err = service.create_order(req).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_dealer_not_under_salesman_rejected() {
        let (db, service) = seeded().await;
        db.identities()
            .insert_salesman(&salesman("s-2", "other@example.com"))
            .await
            .unwrap();
        db.dealers().insert(&dealer("d-2", "s-2")).await.unwrap();

        let mut req = request(vec![line(100.0, None, None)]);
        req.dealer_id = "d-2".to_string();
        let err = service.create_order(req).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Invalid(CoreError::DealerNotUnderSalesman { .. })
        ));
    }

    #[tokio::test]
    async fn test_state_mismatch_rejected() {
        let (db, service) = seeded().await;
        let mut far = dealer("d-far", "s-1");
        far.state = Some("AP".to_string());
        db.dealers().insert(&far).await.unwrap();

        let mut req = request(vec![line(100.0, None, None)]);
        req.dealer_id = "d-far".to_string();
        let err = service.create_order(req).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Invalid(CoreError::StateMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_lines_rejected() {
        let (_db, service) = seeded().await;
        let err = service.create_order(request(Vec::new())).await.unwrap_err();
        assert!(matches!(err, EngineError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_counter_failure_aborts_create() {
        let (db, service) = seeded().await;

        // Make the counter unreachable while the rest of the store works
        sqlx::query("DROP TABLE order_counters")
            .execute(db.pool())
            .await
            .unwrap();

        let err = service
            .create_order(request(vec![line(100.0, None, None)]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::CodeAllocation(_)));

        // Strict policy: no code, no order
        assert!(db.orders().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_renormalizes_replacement_lines() {
        let (_db, service) = seeded().await;

        let order = service
            .create_order(request(vec![line(8500.0, Some(10.0), None)]))
            .await
            .unwrap()
            .order;
        let code = order.order_code.clone();

        // Replacement list carries an out-of-range percentage: clamped
        let updated = service
            .update_order_lines(&order.id, vec![line(1000.0, Some(40.0), None)], None)
            .await
            .unwrap()
            .order;

        assert_eq!(updated.lines[0].discount_pct, Some(30.0));
        assert_eq!(updated.lines[0].discounted_price, Some(700.0));
        assert_eq!(updated.total_price, 1000.0);
        assert_eq!(updated.discount_status, DiscountStatus::Pending);
        assert_eq!(updated.order_code, code);
    }

    #[tokio::test]
    async fn test_status_setters_surface_not_found() {
        let (_db, service) = seeded().await;

        let order = service
            .create_order(request(vec![line(100.0, None, None)]))
            .await
            .unwrap()
            .order;

        service
            .set_status(&order.id, OrderStatus::Approved)
            .await
            .unwrap();
        service
            .set_discount_status(&order.id, DiscountStatus::Approved)
            .await
            .unwrap();
        assert!(matches!(
            service.set_status("o-missing", OrderStatus::Approved).await,
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_states_match_rules() {
        assert!(states_match(Some("MH"), Some("mh")));
        assert!(states_match(None, None));
        assert!(!states_match(Some("MH"), Some("AP")));
        assert!(!states_match(Some("MH"), None));
    }
}
