//! Core business logic - framework-agnostic operations over the entity model.
//!
//! Each module owns one aggregate: validated creation, lookups, the paging
//! queries, and the transactional multi-row operations. Everything is async
//! over a `DatabaseConnection` and returns the crate-wide `Result`.

pub mod category;
pub mod item;
pub mod member;
pub mod order;
pub mod team;
