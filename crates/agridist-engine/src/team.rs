//! # Team Resolver
//!
//! Expands a sales manager to the set of salesman ids under them.
//!
//! ## Strategy Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. The manager record's explicit owned-salesmen id list               │
//! │  2. Salesmen whose stored manager_name equals the manager's display    │
//! │     name, case-insensitively                                            │
//! │                                                                         │
//! │  First NON-EMPTY strategy wins; partial results are never merged       │
//! │  across strategies. The manager's own id is always appended, so their  │
//! │  self-placed orders stay visible to them.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use agridist_core::SalesManager;
use agridist_db::IdentityRepository;

use crate::error::EngineResult;

/// Returns the salesman ids under a manager, the manager's own id last.
pub async fn expand_team(
    identities: &IdentityRepository,
    manager: &SalesManager,
) -> EngineResult<Vec<String>> {
    let mut team: Vec<String> = if !manager.salesman_ids.is_empty() {
        debug!(manager_id = %manager.id, count = manager.salesman_ids.len(),
               "Team from explicit id list");
        manager.salesman_ids.clone()
    } else {
        let by_name = identities.salesmen_by_manager_name(&manager.name).await?;
        debug!(manager_id = %manager.id, count = by_name.len(),
               "Team from manager-name match");
        by_name.into_iter().map(|s| s.id).collect()
    };

    if !team.contains(&manager.id) {
        team.push(manager.id.clone());
    }
    Ok(team)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{db, manager, salesman};

    #[tokio::test]
    async fn test_explicit_list_wins() {
        let db = db().await;
        let repo = db.identities();

        // A salesman whose manager_name also matches must NOT be merged in
        let mut stray = salesman("s-9", "stray@example.com");
        stray.manager_name = Some("Ravi Kulkarni".to_string());
        repo.insert_salesman(&stray).await.unwrap();

        let mut m = manager("m-1", "mgr@example.com");
        m.name = "Ravi Kulkarni".to_string();
        m.salesman_ids = vec!["s-a".to_string(), "s-b".to_string()];

        let team = expand_team(&repo, &m).await.unwrap();
        assert_eq!(team, vec!["s-a", "s-b", "m-1"]);
    }

    #[tokio::test]
    async fn test_manager_name_fallback_is_case_insensitive() {
        let db = db().await;
        let repo = db.identities();

        for (id, email) in [("s-1", "a@example.com"), ("s-2", "b@example.com")] {
            let mut s = salesman(id, email);
            s.manager_name = Some("RAVI KULKARNI".to_string());
            repo.insert_salesman(&s).await.unwrap();
        }

        let mut m = manager("m-1", "mgr@example.com");
        m.name = "ravi kulkarni".to_string();

        let mut team = expand_team(&repo, &m).await.unwrap();
        // Own id appended last
        assert_eq!(team.pop().as_deref(), Some("m-1"));
        team.sort();
        assert_eq!(team, vec!["s-1", "s-2"]);
    }

    #[tokio::test]
    async fn test_empty_strategies_still_include_self() {
        let db = db().await;
        let m = manager("m-1", "mgr@example.com");
        let team = expand_team(&db.identities(), &m).await.unwrap();
        assert_eq!(team, vec!["m-1"]);
    }

    #[tokio::test]
    async fn test_own_id_not_duplicated() {
        let db = db().await;
        let mut m = manager("m-1", "mgr@example.com");
        m.salesman_ids = vec!["s-1".to_string(), "m-1".to_string()];
        let team = expand_team(&db.identities(), &m).await.unwrap();
        assert_eq!(team, vec!["s-1", "m-1"]);
    }
}
