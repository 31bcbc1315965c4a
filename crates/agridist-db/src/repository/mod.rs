//! # Repository Module
//!
//! One repository per aggregate, each holding a `SqlitePool` clone and
//! exposing async operations for that collection. SQL is isolated here;
//! nothing above this crate builds queries.
//!
//! ## Available Repositories
//!
//! - [`identity::IdentityRepository`] - salesmen, sales managers, directors
//! - [`dealer::DealerRepository`] - dealer CRUD and scoped listing
//! - [`product::ProductRepository`] - products, name variants, distinct names
//! - [`order::OrderRepository`] - order persistence and scoped reads
//! - [`counter::CounterRepository`] - atomic per-(fiscal year, state) counters
//! - [`forecast::ForecastRepository`] - monthly forecast upserts

pub mod counter;
pub mod dealer;
pub mod forecast;
pub mod identity;
pub mod order;
pub mod product;
