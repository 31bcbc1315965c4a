//! # Fiscal Year & Order Codes
//!
//! The fiscal year runs April 1 – March 31. Order-code sequences are scoped
//! per (fiscal year, state), each starting its visible series at `0000`.
//!
//! ## Code Anatomy
//! ```text
//! AGD-2025-26-mh-0007
//! ─┬─ ──┬──── ─┬ ──┬─
//!  │    │      │   └── zero-padded tail (counter value − 1)
//!  │    │      └────── lowercased state code, "na" when blank
//!  │    └───────────── fiscal-year label (start year + next year % 100)
//!  └────────────────── fixed prefix
//! ```
//!
//! The counter itself lives in the store (one atomic find-and-increment per
//! key, see agridist-db); this module only does the pure date math and
//! formatting.

use chrono::{DateTime, Datelike, Utc};

/// Fixed prefix on every order code.
pub const ORDER_CODE_PREFIX: &str = "AGD";

/// Returns the fiscal-year bucket label for a timestamp, e.g. `2025-26`.
///
/// For months before April the bucket start year is the previous calendar
/// year: March 31 2025 buckets to `2024-25`, April 1 2025 to `2025-26`.
pub fn fiscal_year_label(at: DateTime<Utc>) -> String {
    let start_year = if at.month() < 4 {
        at.year() - 1
    } else {
        at.year()
    };
    format!("{}-{:02}", start_year, (start_year + 1).rem_euclid(100))
}

/// Normalized state key: lowercased, `"na"` when blank.
///
/// Used both inside the order code and as the counter scope, so the text in
/// the code and the sequence it draws from can never disagree.
pub fn state_key(state: &str) -> String {
    let state = state.trim();
    if state.is_empty() {
        "na".to_string()
    } else {
        state.to_lowercase()
    }
}

/// Formats an order code from a fiscal-year label, a state code, and the
/// raw counter value.
///
/// The store counter is incremented before being read back, so the first
/// allocation returns 1; the visible tail is `counter_value − 1`, making the
/// series start at `0000`.
pub fn order_code(fiscal_label: &str, state: &str, counter_value: i64) -> String {
    let tail = counter_value - 1;
    format!(
        "{ORDER_CODE_PREFIX}-{fiscal_label}-{}-{tail:04}",
        state_key(state)
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
