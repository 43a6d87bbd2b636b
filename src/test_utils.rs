//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{member, team},
    entities,
    errors::Result,
    models::Address,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test member with sensible defaults.
///
/// # Defaults
/// * `age`: 30
/// * `role`: `User`
/// * no embedded address or membership period
pub async fn create_test_member(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::member::Model> {
    member::create_member(
        db,
        name.to_string(),
        Some(30),
        entities::RoleType::User,
        None,
        None,
    )
    .await
}

/// Creates a test team with the given name.
pub async fn create_test_team(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::team::Model> {
    team::create_team(db, name.to_string()).await
}

/// The address fixture used wherever a test just needs some address.
pub fn test_address() -> Address {
    Address::new("seoul", "teheran-ro", "06234")
}
