/// Database configuration and connection management
pub mod database;

/// Catalog seed data loading from catalog.toml
pub mod catalog;
