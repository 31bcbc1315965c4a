//! # Notification Seam
//!
//! After an order is durably created the engine emits a "new order" event
//! carrying the enriched order. Delivery is fire-and-forget: the engine
//! spawns the notifier and swallows failures with a `warn!`, never failing
//! or rolling back the creation.
//!
//! Actual delivery (email etc.) lives outside this repo; [`LogNotifier`] is
//! the default in-process implementation.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::enrich::EnrichedOrder;

/// Notification delivery errors. Logged and swallowed by the engine.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Receives order-created events.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn order_created(&self, order: &EnrichedOrder) -> Result<(), NotifyError>;
}

/// Default notifier: logs the event and succeeds.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl OrderNotifier for LogNotifier {
    async fn order_created(&self, order: &EnrichedOrder) -> Result<(), NotifyError> {
        info!(
            order_id = %order.order.id,
            order_code = %order.order.order_code,
            salesman = order.salesman_name.as_deref().unwrap_or("unknown"),
            dealer = order.dealer_name.as_deref().unwrap_or("unknown"),
            total = order.order.discounted_total,
            "Order created"
        );
        Ok(())
    }
}
