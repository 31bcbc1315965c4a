//! # agridist-core: Pure Business Logic for Agridist
//!
//! This crate is the **heart** of the order engine. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Agridist Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              HTTP / Auth layers (outside this repo)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     agridist-engine                             │   │
//! │  │    identity & team resolution, order ingestion, enrichment     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ agridist-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ discount  │  │  fiscal   │  │ validation│  │   │
//! │  │   │  Order    │  │ normalize │  │ FY bucket │  │   rules   │  │   │
//! │  │   │  Dealer   │  │  clamp    │  │ order code│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  agridist-db (Database Layer)                   │   │
//! │  │           SQLite queries, migrations, atomic counters           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, Dealer, Product, identities, roles)
//! - [`discount`] - Per-line and aggregate discount normalization
//! - [`fiscal`] - Fiscal-year bucketing and order-code formatting
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod fiscal;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{normalize_order, OrderTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use fiscal::{fiscal_year_label, order_code, state_key, ORDER_CODE_PREFIX};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default dealer credit limit in whole currency units.
pub const DEFAULT_CREDIT_LIMIT: i64 = 100_000;

/// Upper bound for a per-line discount percentage. Values above this are
/// silently clamped, never rejected.
pub const MAX_DISCOUNT_PCT: f64 = 30.0;

/// A line only counts as discounted when base minus discounted price exceeds
/// this epsilon. Guards against floating-point noise from a 0% round-trip.
pub const DISCOUNT_EPSILON: f64 = 1e-7;
