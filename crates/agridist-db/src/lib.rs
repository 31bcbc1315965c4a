//! # agridist-db: Database Layer for Agridist
//!
//! Store access for the order engine, backed by SQLite via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Agridist Data Flow                                │
//! │                                                                         │
//! │  agridist-engine (create_order, resolve_caller, ...)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    agridist-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ identity      │    │  (embedded)  │  │   │
//! │  │   │               │    │ dealer/product│    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ order/counter │    │ 001_init.sql │  │   │
//! │  │   │ Management    │    │ forecast      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  The ONLY mutable shared resource needing atomicity is order_counters: │
//! │  its increment is a single server-side upsert (counter.rs).            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::counter::CounterRepository;
pub use repository::dealer::DealerRepository;
pub use repository::forecast::ForecastRepository;
pub use repository::identity::IdentityRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
