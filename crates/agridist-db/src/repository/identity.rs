//! # Identity Repository
//!
//! Storage for the three identity tables: salesmen, sales managers and
//! directors.
//!
//! ## Lookup Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Per identity kind:                                                     │
//! │    by_id      — relation key                                            │
//! │    by_uid     — external auth identifier (exact match)                  │
//! │    by_email   — case-insensitive (COLLATE NOCASE column)                │
//! │                                                                         │
//! │  Plus the uid link: set auth_uid at most once. Relinking the SAME uid   │
//! │  is a no-op; relinking a DIFFERENT uid is refused.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resolution ORDER across kinds (director before manager before
//! salesman, uid before email) lives in the engine, not here; this layer
//! only answers point lookups.

use sqlx::SqlitePool;
use tracing::debug;

use agridist_core::{Director, SalesManager, Salesman};

use crate::error::{DbError, DbResult};

// =============================================================================
// Row Types
// =============================================================================

/// Raw salesman row; `dealers` is a JSON array column.
#[derive(Debug, sqlx::FromRow)]
struct SalesmanRow {
    id: String,
    name: String,
    email: String,
    phone: Option<String>,
    state: Option<String>,
    dealers: String,
    manager_name: Option<String>,
    auth_uid: Option<String>,
    role: Option<String>,
    is_admin: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl SalesmanRow {
    fn into_salesman(self) -> DbResult<Salesman> {
        Ok(Salesman {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            state: self.state,
            dealers: serde_json::from_str(&self.dealers)?,
            manager_name: self.manager_name,
            auth_uid: self.auth_uid,
            role: self.role,
            is_admin: self.is_admin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Raw sales-manager row; `salesman_ids` is a JSON array column.
#[derive(Debug, sqlx::FromRow)]
struct SalesManagerRow {
    id: String,
    name: String,
    email: String,
    phone: Option<String>,
    state: Option<String>,
    salesman_ids: String,
    auth_uid: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl SalesManagerRow {
    fn into_manager(self) -> DbResult<SalesManager> {
        Ok(SalesManager {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            state: self.state,
            salesman_ids: serde_json::from_str(&self.salesman_ids)?,
            auth_uid: self.auth_uid,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SALESMAN_COLS: &str = "id, name, email, phone, state, dealers, manager_name, \
                             auth_uid, role, is_admin, created_at, updated_at";

const MANAGER_COLS: &str = "id, name, email, phone, state, salesman_ids, auth_uid, \
                            created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for salesman, sales-manager and director records.
#[derive(Debug, Clone)]
pub struct IdentityRepository {
    pool: SqlitePool,
}

impl IdentityRepository {
    /// Creates a new IdentityRepository.
    pub fn new(pool: SqlitePool) -> Self {
        IdentityRepository { pool }
    }

    // ===== Salesmen =====

    /// Inserts a salesman record.
    pub async fn insert_salesman(&self, salesman: &Salesman) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO salesmen
                (id, name, email, phone, state, dealers, manager_name,
                 auth_uid, role, is_admin, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&salesman.id)
        .bind(&salesman.name)
        .bind(&salesman.email)
        .bind(&salesman.phone)
        .bind(&salesman.state)
        .bind(serde_json::to_string(&salesman.dealers)?)
        .bind(&salesman.manager_name)
        .bind(&salesman.auth_uid)
        .bind(&salesman.role)
        .bind(salesman.is_admin)
        .bind(salesman.created_at)
        .bind(salesman.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(salesman_id = %salesman.id, "Inserted salesman");
        Ok(())
    }

    pub async fn salesman_by_id(&self, id: &str) -> DbResult<Option<Salesman>> {
        let row: Option<SalesmanRow> = sqlx::query_as(&format!(
            "SELECT {SALESMAN_COLS} FROM salesmen WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SalesmanRow::into_salesman).transpose()
    }

    pub async fn salesman_by_uid(&self, uid: &str) -> DbResult<Option<Salesman>> {
        let row: Option<SalesmanRow> = sqlx::query_as(&format!(
            "SELECT {SALESMAN_COLS} FROM salesmen WHERE auth_uid = ?1"
        ))
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SalesmanRow::into_salesman).transpose()
    }

    /// Email comparison is case-insensitive via the column collation.
    pub async fn salesman_by_email(&self, email: &str) -> DbResult<Option<Salesman>> {
        let row: Option<SalesmanRow> = sqlx::query_as(&format!(
            "SELECT {SALESMAN_COLS} FROM salesmen WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SalesmanRow::into_salesman).transpose()
    }

    /// All salesmen whose stored manager display name matches,
    /// case-insensitively.
    pub async fn salesmen_by_manager_name(&self, manager_name: &str) -> DbResult<Vec<Salesman>> {
        let rows: Vec<SalesmanRow> = sqlx::query_as(&format!(
            "SELECT {SALESMAN_COLS} FROM salesmen \
             WHERE manager_name = ?1 COLLATE NOCASE ORDER BY name"
        ))
        .bind(manager_name)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SalesmanRow::into_salesman).collect()
    }

    pub async fn list_salesmen(&self) -> DbResult<Vec<Salesman>> {
        let rows: Vec<SalesmanRow> = sqlx::query_as(&format!(
            "SELECT {SALESMAN_COLS} FROM salesmen ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SalesmanRow::into_salesman).collect()
    }

    /// Links an auth uid to a salesman. Set-once: linking the same uid again
    /// is a no-op, linking a different uid over an existing one is refused.
    pub async fn link_salesman_uid(&self, id: &str, uid: &str) -> DbResult<()> {
        self.link_uid("salesmen", id, uid).await
    }

    // ===== Sales Managers =====

    /// Inserts a sales-manager record.
    pub async fn insert_manager(&self, manager: &SalesManager) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sales_managers
                (id, name, email, phone, state, salesman_ids, auth_uid,
                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&manager.id)
        .bind(&manager.name)
        .bind(&manager.email)
        .bind(&manager.phone)
        .bind(&manager.state)
        .bind(serde_json::to_string(&manager.salesman_ids)?)
        .bind(&manager.auth_uid)
        .bind(manager.created_at)
        .bind(manager.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(manager_id = %manager.id, "Inserted sales manager");
        Ok(())
    }

    pub async fn manager_by_id(&self, id: &str) -> DbResult<Option<SalesManager>> {
        let row: Option<SalesManagerRow> = sqlx::query_as(&format!(
            "SELECT {MANAGER_COLS} FROM sales_managers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SalesManagerRow::into_manager).transpose()
    }

    pub async fn manager_by_uid(&self, uid: &str) -> DbResult<Option<SalesManager>> {
        let row: Option<SalesManagerRow> = sqlx::query_as(&format!(
            "SELECT {MANAGER_COLS} FROM sales_managers WHERE auth_uid = ?1"
        ))
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SalesManagerRow::into_manager).transpose()
    }

    pub async fn manager_by_email(&self, email: &str) -> DbResult<Option<SalesManager>> {
        let row: Option<SalesManagerRow> = sqlx::query_as(&format!(
            "SELECT {MANAGER_COLS} FROM sales_managers WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SalesManagerRow::into_manager).transpose()
    }

    pub async fn link_manager_uid(&self, id: &str, uid: &str) -> DbResult<()> {
        self.link_uid("sales_managers", id, uid).await
    }

    // ===== Directors =====

    /// Inserts a director record.
    pub async fn insert_director(&self, director: &Director) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO directors
                (id, name, email, phone, state, auth_uid, active,
                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&director.id)
        .bind(&director.name)
        .bind(&director.email)
        .bind(&director.phone)
        .bind(&director.state)
        .bind(&director.auth_uid)
        .bind(director.active)
        .bind(director.created_at)
        .bind(director.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(director_id = %director.id, "Inserted director");
        Ok(())
    }

    pub async fn director_by_uid(&self, uid: &str) -> DbResult<Option<Director>> {
        let director: Option<Director> = sqlx::query_as(
            "SELECT id, name, email, phone, state, auth_uid, active, \
                    created_at, updated_at \
             FROM directors WHERE auth_uid = ?1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(director)
    }

    pub async fn director_by_email(&self, email: &str) -> DbResult<Option<Director>> {
        let director: Option<Director> = sqlx::query_as(
            "SELECT id, name, email, phone, state, auth_uid, active, \
                    created_at, updated_at \
             FROM directors WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(director)
    }

    pub async fn link_director_uid(&self, id: &str, uid: &str) -> DbResult<()> {
        self.link_uid("directors", id, uid).await
    }

    // ===== Shared =====

    /// Conditional uid write shared by the three tables. The WHERE clause
    /// only matches when auth_uid is unset or already equal, which is what
    /// makes re-linking the same uid idempotent and relinking a different
    /// uid a no-op refused with NotFound on the zero-row update.
    async fn link_uid(&self, table: &str, id: &str, uid: &str) -> DbResult<()> {
        let result = sqlx::query(&format!(
            "UPDATE {table} SET auth_uid = ?2, updated_at = ?3 \
             WHERE id = ?1 AND (auth_uid IS NULL OR auth_uid = ?2)"
        ))
        .bind(id)
        .bind(uid)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(table, id));
        }

        debug!(table = %table, id = %id, "Linked auth uid");
        Ok(())
    }

    /// Administrative: detaches every auth uid across all identity tables.
    /// External reset tooling only.
    pub async fn clear_auth_uids(&self) -> DbResult<u64> {
        let mut cleared = 0;
        for table in ["salesmen", "sales_managers", "directors"] {
            let result = sqlx::query(&format!(
                "UPDATE {table} SET auth_uid = NULL WHERE auth_uid IS NOT NULL"
            ))
            .execute(&self.pool)
            .await?;
            cleared += result.rows_affected();
        }
        Ok(cleared)
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

    fn salesman(id: &str, email: &str) -> Salesman {
        let now = Utc::now();
        Salesman {
            id: id.to_string(),
            name: format!("Salesman {id}"),
            email: email.to_string(),
            phone: None,
            state: Some("MH".to_string()),
            dealers: vec!["d-1".to_string()],
            manager_name: Some("Ravi Kulkarni".to_string()),
            auth_uid: None,
            role: None,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn director(id: &str, email: &str) -> Director {
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

    #[tokio::test]
    async fn test_salesman_roundtrip_preserves_dealer_list() {
        let db = db().await;
        let repo = db.identities();

        repo.insert_salesman(&salesman("s-1", "a@example.com"))
            .await
            .unwrap();

        let found = repo.salesman_by_id("s-1").await.unwrap().unwrap();
        assert_eq!(found.dealers, vec!["d-1".to_string()]);
        assert_eq!(found.state.as_deref(), Some("MH"));
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive() {
        let db = db().await;
        let repo = db.identities();

        repo.insert_salesman(&salesman("s-1", "Amit.P@Example.com"))
            .await
            .unwrap();

        let found = repo.salesman_by_email("amit.p@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, "s-1");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_regardless_of_case() {
        let db = db().await;
        let repo = db.identities();

        repo.insert_salesman(&salesman("s-1", "a@example.com"))
            .await
            .unwrap();
        let err = repo
            .insert_salesman(&salesman("s-2", "A@EXAMPLE.COM"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_link_uid_set_once_semantics() {
        let db = db().await;
        let repo = db.identities();

        repo.insert_salesman(&salesman("s-1", "a@example.com"))
            .await
            .unwrap();

        repo.link_salesman_uid("s-1", "uid-1").await.unwrap();
        // Same uid again is a no-op success
        repo.link_salesman_uid("s-1", "uid-1").await.unwrap();
        // A different uid is refused and the stored one survives
        assert!(repo.link_salesman_uid("s-1", "uid-2").await.is_err());

        let found = repo.salesman_by_uid("uid-1").await.unwrap().unwrap();
        assert_eq!(found.id, "s-1");
        assert!(repo.salesman_by_uid("uid-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_salesmen_by_manager_name_ignores_case() {
        let db = db().await;
        let repo = db.identities();

        repo.insert_salesman(&salesman("s-1", "a@example.com"))
            .await
            .unwrap();
        repo.insert_salesman(&salesman("s-2", "b@example.com"))
            .await
            .unwrap();

        let team = repo.salesmen_by_manager_name("ravi kulkarni").await.unwrap();
        assert_eq!(team.len(), 2);
    }

    #[tokio::test]
    async fn test_director_lookup_and_linking() {
        let db = db().await;
        let repo = db.identities();

        repo.insert_director(&director("dir-1", "boss@example.com"))
            .await
            .unwrap();
        assert!(repo.director_by_uid("uid-9").await.unwrap().is_none());

        repo.link_director_uid("dir-1", "uid-9").await.unwrap();
        let found = repo.director_by_uid("uid-9").await.unwrap().unwrap();
        assert!(found.active);
        assert_eq!(
            repo.director_by_email("BOSS@example.com")
                .await
                .unwrap()
                .unwrap()
                .id,
            "dir-1"
        );
    }

    #[tokio::test]
    async fn test_clear_auth_uids_detaches_everything() {
        let db = db().await;
        let repo = db.identities();

        repo.insert_salesman(&salesman("s-1", "a@example.com"))
            .await
            .unwrap();
        repo.link_salesman_uid("s-1", "uid-1").await.unwrap();

        let cleared = repo.clear_auth_uids().await.unwrap();
        assert_eq!(cleared, 1);
        assert!(repo.salesman_by_uid("uid-1").await.unwrap().is_none());
    }
}
