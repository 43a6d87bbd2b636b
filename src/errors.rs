//! Unified error type for the crate.
//!
//! Business modules and the session layer share one `Error` enum; `sea_orm::DbErr`
//! and I/O errors convert via `#[from]`, everything else uses struct variants so
//! callers can match on the offending value.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Member not found: {id}")]
    MemberNotFound { id: i64 },

    #[error("Developer not found: {id}")]
    DeveloperNotFound { id: i64 },

    #[error("Item not found: {name}")]
    ItemNotFound { name: String },

    #[error("Order not found: {id}")]
    OrderNotFound { id: i64 },

    #[error("Category not found: {id}")]
    CategoryNotFound { id: i64 },

    #[error("Team not found: {id}")]
    TeamNotFound { id: i64 },

    #[error("Insufficient stock for item {item_id}: {available} available, {requested} requested")]
    InsufficientStock {
        item_id: i64,
        available: i32,
        requested: i32,
    },

    #[error("Invalid quantity: {count}")]
    InvalidQuantity { count: i32 },

    #[error("Invalid price: {price}")]
    InvalidPrice { price: i32 },

    #[error("Snapshot serialization error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// An operation targeted an entity the current session does not manage.
    #[error("{kind} #{id} is not managed by this session")]
    NotManaged { kind: &'static str, id: i64 },

    /// A cascade operation targeted a child that belongs to a different parent.
    #[error("{kind} #{id} does not belong to parent #{parent_id}")]
    NotOwned {
        kind: &'static str,
        id: i64,
        parent_id: i64,
    },

    /// A lazy reference pointed at a row that no longer exists.
    #[error("cannot initialize reference to {kind} #{id}: no such row")]
    BrokenReference { kind: &'static str, id: i64 },
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
