//! # Domain Types
//!
//! Core domain types for the order engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │     Dealer      │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  order_code     │   │  salesman_id    │   │  name (dup ok)  │       │
//! │  │  lines[]        │   │  state          │   │  price tiers    │       │
//! │  │  discount data  │   │  credit_limit   │   │  gst_percentage │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Identities: Salesman / SalesManager / Director, each with an          │
//! │  optional external auth uid (set once, then immutable) and a Role.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for relations
//! - Business ID where one exists (`order_code`) - human-readable, sequential

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// Organizational role of a caller.
///
/// Stored records carry a loose string role field plus a legacy `is_admin`
/// boolean; [`Role::from_record`] is the one migration point from that duck
/// typing into a closed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Top-level administrative identity.
    Admin,
    /// Top-level organizational identity (sees everything).
    Director,
    /// Owns zero or more salesmen.
    SalesManager,
    /// Owns zero or more dealers.
    Salesman,
    /// No identity resolved. List endpoints show nothing, mutations are
    /// denied.
    Guest,
}

impl Role {
    /// Derives a role from a stored record's loose fields.
    ///
    /// The explicit role string is authoritative when it names a known role;
    /// otherwise the legacy `is_admin` boolean decides, defaulting to
    /// salesman.
    pub fn from_record(role: Option<&str>, legacy_is_admin: bool) -> Role {
        match role.map(str::trim) {
            Some("admin") => Role::Admin,
            Some("sales_manager") => Role::SalesManager,
            Some("salesman") => Role::Salesman,
            _ if legacy_is_admin => Role::Admin,
            _ => Role::Salesman,
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfillment status of an order. Transitions are set by external admin
/// action, not by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting admin action.
    #[default]
    Pending,
    /// Accepted for fulfillment.
    Approved,
    /// Rejected/abandoned.
    Discarded,
}

/// Approval state of an order's discount, independent of fulfillment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum DiscountStatus {
    /// A real discount is present and awaits approval.
    Pending,
    /// Approved, or no actual discount exists.
    Approved,
    /// Rejected by the approver.
    Rejected,
}

// =============================================================================
// Order Lines
// =============================================================================

/// A product line on an order.
///
/// On input exactly one of `discount_pct` / `discounted_price` may be
/// supplied; the normalizer derives the other and both are always populated
/// on output. See [`crate::discount`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i64,
    /// Base line total BEFORE discount. Missing input is treated as 0.
    #[serde(default)]
    pub price: f64,
    /// Denormalized display name, attached on the read path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Per-line discount percentage, clamped to [0, 30].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_pct: Option<f64>,
    /// Line total AFTER discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
}

/// The deprecated single-product order shape still present in historical
/// data: one product reference at the top level instead of a line list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyOrderLine {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
}

/// What the store may hand back for an order's line document: the current
/// multi-line shape or the legacy single-line shape.
///
/// [`StoredLines::upgrade`] is the one conversion point; the legacy shape
/// must never leak past the enrichment boundary. Stored data is not mutated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredLines {
    Current(Vec<OrderLine>),
    Legacy(LegacyOrderLine),
}

impl StoredLines {
    /// Upconverts to the current multi-line shape.
    ///
    /// A legacy order never carried discount figures, so its single line
    /// upgrades to an undiscounted line with both figures populated.
    pub fn upgrade(self) -> Vec<OrderLine> {
        match self {
            StoredLines::Current(lines) => lines,
            StoredLines::Legacy(line) => vec![OrderLine {
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.price,
                product_name: None,
                discount_pct: Some(0.0),
                discounted_price: Some(line.price),
            }],
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A stored order.
///
/// Created by the normalizer + code generator in one sequence; the engine
/// never persists an order without an `order_code`, and the code is
/// immutable once assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// 2-letter state code scoping the order-code sequence. May be blank.
    pub state: String,
    pub salesman_id: String,
    pub dealer_id: String,
    /// Non-empty line list, always fully normalized.
    pub lines: Vec<OrderLine>,
    /// Sum of line bases.
    pub total_price: f64,
    /// Aggregate discount percentage over the whole order.
    pub discount: f64,
    /// Sum of line discounted prices.
    pub discounted_total: f64,
    pub status: OrderStatus,
    pub discount_status: DiscountStatus,
    /// Human-readable sequential code, e.g. `AGD-2025-26-mh-0007`.
    pub order_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Identities
// =============================================================================

/// A salesman identity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salesman {
    pub id: String,
    pub name: String,
    /// Case-insensitively unique within salesmen.
    pub email: String,
    pub phone: Option<String>,
    pub state: Option<String>,
    /// Dealer ids owned by this salesman.
    #[serde(default)]
    pub dealers: Vec<String>,
    /// Display name of the owning manager; used by the fallback team
    /// resolution strategy.
    pub manager_name: Option<String>,
    /// External auth identifier. Set at most once, then immutable.
    pub auth_uid: Option<String>,
    /// Loose role string; see [`Role::from_record`].
    pub role: Option<String>,
    /// Legacy admin flag, superseded by `role` where that is set.
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Salesman {
    /// The effective role of this record.
    pub fn effective_role(&self) -> Role {
        Role::from_record(self.role.as_deref(), self.is_admin)
    }
}

/// A sales-manager identity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesManager {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub state: Option<String>,
    /// Explicit list of owned salesman ids (team strategy 1).
    #[serde(default)]
    pub salesman_ids: Vec<String>,
    pub auth_uid: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A director identity record. Organizationally top-level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Director {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub state: Option<String>,
    pub auth_uid: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Dealer
// =============================================================================

/// A dealer, owned by exactly one salesman.
///
/// For an order to validate the dealer's state must equal its owning
/// salesman's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Dealer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub state: Option<String>,
    pub salesman_id: String,
    /// Defaults to [`crate::DEFAULT_CREDIT_LIMIT`].
    pub credit_limit: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product. Names are NOT unique — multiple packing variants share a name
/// and differ in packing size, so name-level queries must return all
/// variants and let the caller disambiguate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    /// e.g. "50x100 ML"
    pub packing_size: String,
    pub bottles_per_case: i64,
    pub bottle_volume: String,
    /// Minimum order quantity, e.g. "one case".
    pub moq: String,
    pub dealer_price_per_bottle: f64,
    pub gst_percentage: f64,
    /// Dealer price + GST.
    pub billing_price_per_bottle: f64,
    pub mrp_per_bottle: f64,
    pub product_details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Forecast
// =============================================================================

/// One product entry inside a monthly forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastLine {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer_name: Option<String>,
}

/// A per-(salesman, year, month) sales forecast. Upserted as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub id: String,
    pub salesman_id: String,
    pub year: i32,
    pub month: i32,
    pub lines: Vec<ForecastLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
