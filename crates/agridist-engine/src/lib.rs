//! # agridist-engine: Order Ingestion & Identity Resolution
//!
//! The engine proper, orchestrating agridist-core rules over agridist-db
//! storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Agridist Engine Surface                             │
//! │                                                                         │
//! │  Caller (uid / email)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────┐     ┌──────────────────┐                         │
//! │  │ IdentityResolver │────►│   Team Resolver  │  who is this, whose    │
//! │  │  (identity.rs)   │     │    (team.rs)     │  orders may they see   │
//! │  └──────────────────┘     └──────────────────┘                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────┐     ┌──────────────────┐    ┌────────────────┐  │
//! │  │   OrderService   │────►│    Enrichment    │───►│   Notifier     │  │
//! │  │   (orders.rs)    │     │   (enrich.rs)    │    │  (notify.rs)   │  │
//! │  │ validate→        │     │ names onto ids,  │    │ fire & forget  │  │
//! │  │ normalize→code→  │     │ legacy shape     │    │                │  │
//! │  │ persist→notify   │     │ stays inside     │    │                │  │
//! │  └──────────────────┘     └──────────────────┘    └────────────────┘  │
//! │                                                                         │
//! │  HTTP routing and credential verification live OUTSIDE this repo: the  │
//! │  engine receives an opaque uid and/or email per call and trusts it.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Environment-based configuration
//! - [`error`] - Caller-facing error taxonomy
//! - [`identity`] - Caller resolution and visibility scope
//! - [`team`] - Manager-to-team expansion
//! - [`orders`] - Order ingestion, reads, status transitions
//! - [`forecast`] - Monthly forecast submission and reads
//! - [`enrich`] - Display-name joins for read responses
//! - [`notify`] - Order-created notification seam

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod enrich;
pub mod error;
pub mod forecast;
pub mod identity;
pub mod notify;
pub mod orders;
pub mod team;

#[cfg(test)]
pub(crate) mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError};
pub use enrich::EnrichedOrder;
pub use error::{EngineError, EngineResult};
pub use forecast::ForecastService;
pub use identity::{Caller, IdentityResolver, Visibility};
pub use notify::{LogNotifier, NotifyError, OrderNotifier};
pub use orders::{CreateOrderRequest, OrderService};
