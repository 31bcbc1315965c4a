//! # Read-Path Enrichment
//!
//! Joins display names onto stored ids for read responses: product name per
//! line, dealer name and salesman name per order, product and dealer names
//! per forecast line.
//!
//! The legacy single-line stored shape is already upgraded by the repository
//! on read; nothing past this boundary ever sees it. Enrichment performs no
//! business logic and never mutates stored data.

use std::collections::HashMap;

use serde::Serialize;

use agridist_core::{Forecast, Order};
use agridist_db::Database;

use crate::error::EngineResult;

/// An order with display names attached for read responses.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub salesman_name: Option<String>,
    pub dealer_name: Option<String>,
}

/// Attaches display names to one order.
pub async fn enrich_order(db: &Database, mut order: Order) -> EngineResult<EnrichedOrder> {
    let product_ids: Vec<String> = order
        .lines
        .iter()
        .map(|l| l.product_id.clone())
        .collect();
    let names: HashMap<String, String> = db
        .products()
        .names_for_ids(&product_ids)
        .await?
        .into_iter()
        .collect();

    for line in &mut order.lines {
        line.product_name = names.get(&line.product_id).cloned();
    }

    let salesman_name = db
        .identities()
        .salesman_by_id(&order.salesman_id)
        .await?
        .map(|s| s.name);
    let dealer_name = db.dealers().get_by_id(&order.dealer_id).await?.map(|d| d.name);

    Ok(EnrichedOrder {
        order,
        salesman_name,
        dealer_name,
    })
}

/// Attaches display names to a batch of orders, resolving each referenced
/// product, salesman and dealer once.
pub async fn enrich_orders(db: &Database, orders: Vec<Order>) -> EngineResult<Vec<EnrichedOrder>> {
    let product_ids: Vec<String> = orders
        .iter()
        .flat_map(|o| o.lines.iter().map(|l| l.product_id.clone()))
        .collect();
    let product_names: HashMap<String, String> = db
        .products()
        .names_for_ids(&dedup(product_ids))
        .await?
        .into_iter()
        .collect();

    let mut salesman_names: HashMap<String, String> = HashMap::new();
    let mut dealer_names: HashMap<String, String> = HashMap::new();

    let mut enriched = Vec::with_capacity(orders.len());
    for mut order in orders {
        for line in &mut order.lines {
            line.product_name = product_names.get(&line.product_id).cloned();
        }

        if !salesman_names.contains_key(&order.salesman_id) {
            if let Some(s) = db.identities().salesman_by_id(&order.salesman_id).await? {
                salesman_names.insert(order.salesman_id.clone(), s.name);
            }
        }
        if !dealer_names.contains_key(&order.dealer_id) {
            if let Some(d) = db.dealers().get_by_id(&order.dealer_id).await? {
                dealer_names.insert(order.dealer_id.clone(), d.name);
            }
        }

        let salesman_name = salesman_names.get(&order.salesman_id).cloned();
        let dealer_name = dealer_names.get(&order.dealer_id).cloned();
        enriched.push(EnrichedOrder {
            order,
            salesman_name,
            dealer_name,
        });
    }

    Ok(enriched)
}

/// Attaches product and dealer display names to a forecast's lines.
pub async fn enrich_forecast(db: &Database, mut forecast: Forecast) -> EngineResult<Forecast> {
    let product_ids: Vec<String> = forecast
        .lines
        .iter()
        .map(|l| l.product_id.clone())
        .collect();
    let product_names: HashMap<String, String> = db
        .products()
        .names_for_ids(&dedup(product_ids))
        .await?
        .into_iter()
        .collect();

    for line in &mut forecast.lines {
        line.product_name = product_names.get(&line.product_id).cloned();
        if let Some(dealer_id) = &line.dealer_id {
            if line.dealer_name.is_none() {
                line.dealer_name = db.dealers().get_by_id(dealer_id).await?.map(|d| d.name);
            }
        }
    }

    Ok(forecast)
}

fn dedup(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids.dedup();
    ids
}
