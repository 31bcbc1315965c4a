//! # Identity Resolver
//!
//! Maps a caller's opaque external uid and/or email to exactly one internal
//! identity and a visibility scope.
//!
//! ## Resolution Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. director  by uid                                                    │
//! │  2. director  by email              (link uid if supplied)             │
//! │  3. manager   by uid                                                    │
//! │  4. salesman  by uid                                                    │
//! │  5. manager   by email              (link uid if supplied)             │
//! │  6. salesman  by email              (link uid if supplied)             │
//! │                                                                         │
//! │  First hit wins. Email matches are case-insensitive exact.             │
//! │                                                                         │
//! │  FAIL CLOSED: an email-only hit (no uid supplied) on a salesman        │
//! │  record that has NEVER been linked to a uid resolves to Guest, not     │
//! │  to that salesman. Email alone does not prove identity for an          │
//! │  unlinked record.                                                      │
//! │                                                                         │
//! │  No hit at all → Guest. Never an error: list endpoints show nothing,   │
//! │  mutating endpoints deny.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Opportunistic linking: a successful email match with a supplied uid
//! writes that uid onto the record so later calls take the uid path. The
//! write is set-once; if a different uid is already stored the link is
//! skipped and resolution proceeds with the matched record.

use tracing::{debug, warn};

use agridist_core::{Director, Role, SalesManager, Salesman};
use agridist_db::{Database, IdentityRepository};

use crate::error::EngineResult;
use crate::team::expand_team;

// =============================================================================
// Caller
// =============================================================================

/// The resolved identity of a caller.
#[derive(Debug, Clone)]
pub enum Caller {
    Director(Director),
    Manager(SalesManager),
    Salesman(Salesman),
    /// Nothing resolved. Empty visibility, mutations denied.
    Guest,
}

impl Caller {
    /// The caller's effective role.
    pub fn role(&self) -> Role {
        match self {
            Caller::Director(_) => Role::Director,
            Caller::Manager(_) => Role::SalesManager,
            Caller::Salesman(s) => s.effective_role(),
            Caller::Guest => Role::Guest,
        }
    }

    /// The resolved record's internal id, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Caller::Director(d) => Some(&d.id),
            Caller::Manager(m) => Some(&m.id),
            Caller::Salesman(s) => Some(&s.id),
            Caller::Guest => None,
        }
    }
}

/// The set of salesmen whose orders and dealers a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Everything (directors and admins).
    All,
    /// Orders and dealers of exactly these salesman ids.
    Team(Vec<String>),
    /// Guest: show nothing.
    Nothing,
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves callers against the identity tables.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    identities: IdentityRepository,
}

impl IdentityResolver {
    /// Creates a resolver over the given database handle.
    pub fn new(db: &Database) -> Self {
        IdentityResolver {
            identities: db.identities(),
        }
    }

    /// Resolves a caller from an external uid and/or email.
    ///
    /// A miss resolves to [`Caller::Guest`]; only storage failures error.
    pub async fn resolve(&self, uid: Option<&str>, email: Option<&str>) -> EngineResult<Caller> {
        // 1. Director by uid
        if let Some(uid) = uid {
            if let Some(director) = self.identities.director_by_uid(uid).await? {
                debug!(director_id = %director.id, "Resolved director by uid");
                return Ok(Caller::Director(director));
            }
        }

        // 2. Director by email
        if let Some(email) = email {
            if let Some(director) = self.identities.director_by_email(email).await? {
                if let Some(uid) = uid {
                    self.try_link(
                        LinkKind::Director,
                        &director.id,
                        director.auth_uid.as_deref(),
                        uid,
                    )
                    .await;
                }
                debug!(director_id = %director.id, "Resolved director by email");
                return Ok(Caller::Director(director));
            }
        }

        // 3 & 4. Manager then salesman by uid
        if let Some(uid) = uid {
            if let Some(manager) = self.identities.manager_by_uid(uid).await? {
                debug!(manager_id = %manager.id, "Resolved manager by uid");
                return Ok(Caller::Manager(manager));
            }
            if let Some(salesman) = self.identities.salesman_by_uid(uid).await? {
                debug!(salesman_id = %salesman.id, "Resolved salesman by uid");
                return Ok(Caller::Salesman(salesman));
            }
        }

        // 5 & 6. Manager then salesman by email
        if let Some(email) = email {
            if let Some(manager) = self.identities.manager_by_email(email).await? {
                if let Some(uid) = uid {
                    self.try_link(
                        LinkKind::Manager,
                        &manager.id,
                        manager.auth_uid.as_deref(),
                        uid,
                    )
                    .await;
                }
                debug!(manager_id = %manager.id, "Resolved manager by email");
                return Ok(Caller::Manager(manager));
            }

            if let Some(salesman) = self.identities.salesman_by_email(email).await? {
                match uid {
                    Some(uid) => {
                        self.try_link(
                            LinkKind::Salesman,
                            &salesman.id,
                            salesman.auth_uid.as_deref(),
                            uid,
                        )
                        .await;
                        debug!(salesman_id = %salesman.id, "Resolved salesman by email");
                        return Ok(Caller::Salesman(salesman));
                    }
                    None if salesman.auth_uid.is_some() => {
                        debug!(salesman_id = %salesman.id, "Resolved linked salesman by email");
                        return Ok(Caller::Salesman(salesman));
                    }
                    None => {
                        // Never-linked record, no uid supplied: email alone
                        // does not prove identity.
                        debug!(
                            salesman_id = %salesman.id,
                            "Email matched never-linked salesman without uid; failing closed"
                        );
                        return Ok(Caller::Guest);
                    }
                }
            }
        }

        debug!("No identity resolved; guest scope");
        Ok(Caller::Guest)
    }

    /// Computes the caller's visibility scope, expanding a manager to their
    /// team.
    pub async fn visibility(&self, caller: &Caller) -> EngineResult<Visibility> {
        match caller {
            Caller::Director(_) => Ok(Visibility::All),
            Caller::Salesman(s) if s.effective_role() == Role::Admin => Ok(Visibility::All),
            Caller::Manager(manager) => {
                let team = expand_team(&self.identities, manager).await?;
                Ok(Visibility::Team(team))
            }
            Caller::Salesman(s) => Ok(Visibility::Team(vec![s.id.clone()])),
            Caller::Guest => Ok(Visibility::Nothing),
        }
    }

    /// Attempts the opportunistic uid link; failures never affect
    /// resolution.
    async fn try_link(&self, kind: LinkKind, id: &str, stored_uid: Option<&str>, uid: &str) {
        match stored_uid {
            Some(stored) if stored == uid => {} // already linked
            Some(_) => {
                // A different uid is stored; linking never overwrites it.
                debug!(kind = ?kind, id = %id, "Skipping uid link; record already linked");
            }
            None => {
                let result = match kind {
                    LinkKind::Director => self.identities.link_director_uid(id, uid).await,
                    LinkKind::Manager => self.identities.link_manager_uid(id, uid).await,
                    LinkKind::Salesman => self.identities.link_salesman_uid(id, uid).await,
                };
                if let Err(err) = result {
                    warn!(kind = ?kind, id = %id, error = %err, "Opportunistic uid link failed");
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LinkKind {
    Director,
    Manager,
    Salesman,
}

// =============================================================================
// Unit Tests
// =============================================================================
