//! # Product Repository
//!
//! Storage for the product catalog. Product names are not unique: packing
//! variants share a name, so name queries always return every variant.

use sqlx::SqlitePool;
use tracing::debug;

use agridist_core::Product;

use crate::error::DbResult;

const PRODUCT_COLS: &str = "id, name, category, packing_size, bottles_per_case, \
                            bottle_volume, moq, dealer_price_per_bottle, gst_percentage, \
                            billing_price_per_bottle, mrp_per_bottle, product_details, \
                            created_at, updated_at";

/// Repository for product records.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product record.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, category, packing_size, bottles_per_case, bottle_volume,
                 moq, dealer_price_per_bottle, gst_percentage, billing_price_per_bottle,
                 mrp_per_bottle, product_details, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.packing_size)
        .bind(product.bottles_per_case)
        .bind(&product.bottle_volume)
        .bind(&product.moq)
        .bind(product.dealer_price_per_bottle)
        .bind(product.gst_percentage)
        .bind(product.billing_price_per_bottle)
        .bind(product.mrp_per_bottle)
        .bind(&product.product_details)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(product_id = %product.id, name = %product.name, "Inserted product");
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product: Option<Product> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLS} FROM products WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(product)
    }

    /// Every packing variant sharing the given name.
    pub async fn list_by_name(&self, name: &str) -> DbResult<Vec<Product>> {
        let products: Vec<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLS} FROM products WHERE name = ?1 ORDER BY packing_size"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products: Vec<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLS} FROM products ORDER BY name, packing_size"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Distinct product names, for catalog listings.
    pub async fn distinct_names(&self) -> DbResult<Vec<String>> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT name FROM products ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(names)
    }

    /// Resolves display names for a set of product ids in one query.
    pub async fn names_for_ids(&self, ids: &[String]) -> DbResult<Vec<(String, String)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "SELECT id, name FROM products WHERE id IN ({})",
            placeholders.join(", ")
        );

        let mut query = sqlx::query_as::<_, (String, String)>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn product(id: &str, name: &str, packing: &str) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: name.to_string(),
            category: "Insecticide".to_string(),
            packing_size: packing.to_string(),
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

    #[tokio::test]
    async fn test_name_query_returns_all_packing_variants() {
        let db = db().await;
        let repo = db.products();

        repo.insert(&product("p-1", "AgriShield", "50x100 ML"))
            .await
            .unwrap();
        repo.insert(&product("p-2", "AgriShield", "20x250 ML"))
            .await
            .unwrap();
        repo.insert(&product("p-3", "GreenBoost", "50x100 ML"))
            .await
            .unwrap();

        let variants = repo.list_by_name("AgriShield").await.unwrap();
        assert_eq!(variants.len(), 2);

        let names = repo.distinct_names().await.unwrap();
        assert_eq!(names, vec!["AgriShield", "GreenBoost"]);
    }

    #[tokio::test]
    async fn test_names_for_ids_batch_lookup() {
        let db = db().await;
        let repo = db.products();

        repo.insert(&product("p-1", "AgriShield", "50x100 ML"))
            .await
            .unwrap();
        repo.insert(&product("p-2", "GreenBoost", "50x100 ML"))
            .await
            .unwrap();

        let ids = vec!["p-1".to_string(), "p-2".to_string(), "p-x".to_string()];
        let names = repo.names_for_ids(&ids).await.unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&("p-1".to_string(), "AgriShield".to_string())));
    }
}
