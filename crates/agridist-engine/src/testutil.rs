//! Shared test fixtures for the engine test modules.

use std::sync::Arc;

use chrono::Utc;

use agridist_core::{
    Dealer, Director, OrderLine, Product, SalesManager, Salesman, DEFAULT_CREDIT_LIMIT,
};
use agridist_db::{Database, DbConfig};

use crate::config::AppConfig;
use crate::notify::LogNotifier;
use crate::orders::OrderService;

pub async fn db() -> Database {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    Database::new(DbConfig::in_memory()).await.unwrap()
}

pub fn service_over(db: &Database) -> OrderService {
    OrderService::new(db.clone(), Arc::new(LogNotifier), &AppConfig::default())
}

pub fn salesman(id: &str, email: &str) -> Salesman {
    let now = Utc::now();
    Salesman {
        id: id.to_string(),
        name: format!("Salesman {id}"),
        email: email.to_string(),
        phone: None,
        state: Some("MH".to_string()),
        dealers: Vec::new(),
        manager_name: None,
        auth_uid: None,
        role: None,
        is_admin: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn manager(id: &str, email: &str) -> SalesManager {
    let now = Utc::now();
    SalesManager {
        id: id.to_string(),
        name: format!("Manager {id}"),
        email: email.to_string(),
        phone: None,
        state: Some("MH".to_string()),
        salesman_ids: Vec::new(),
        auth_uid: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn director(id: &str, email: &str) -> Director {
    let now = Utc::now();
    Director {
        id: id.to_string(),
        name: format!("Director {id}"),
        email: email.to_string(),
        phone: None,
        state: None,
        auth_uid: None,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn dealer(id: &str, salesman_id: &str) -> Dealer {
    let now = Utc::now();
    Dealer {
        id: id.to_string(),
        name: format!("Dealer {id}"),
        phone: None,
        state: Some("MH".to_string()),
        salesman_id: salesman_id.to_string(),
        credit_limit: DEFAULT_CREDIT_LIMIT,
        created_at: now,
        updated_at: now,
    }
}

pub fn product(id: &str, name: &str) -> Product {
    let now = Utc::now();
    Product {
        id: id.to_string(),
        name: name.to_string(),
        category: "Insecticide".to_string(),
        packing_size: "50x100 ML".to_string(),
        bottles_per_case: 50,
        bottle_volume: "100 ML".to_string(),
        moq: "one case".to_string(),
        dealer_price_per_bottle: 120.0,
        gst_percentage: 18.0,
        billing_price_per_bottle: 141.6,
        mrp_per_bottle: 180.0,
        product_details: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn line(price: f64, discount_pct: Option<f64>, discounted_price: Option<f64>) -> OrderLine {
    OrderLine {
        product_id: "p-1".to_string(),
        quantity: 1,
        price,
        product_name: None,
        discount_pct,
        discounted_price,
    }
}
