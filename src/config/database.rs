//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables
//! are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without hand-written SQL.

use crate::entities::{
    AddressHistory, Category, CategoryItem, Child, Delivery, Developer, FavoriteFood, Item,
    Member, Order, OrderItem, Parent, Team,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/ordershop.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using `DATABASE_URL`,
/// falling back to a default local file if the variable is not set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates every table from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    db.execute(builder.build(&schema.create_table_from_entity(Member)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(FavoriteFood)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(AddressHistory)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Item)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Delivery)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Order)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(OrderItem)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Category)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(CategoryItem)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Team)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Developer)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Parent)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Child)))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        item::Model as ItemModel, member::Model as MemberModel, order::Model as OrderModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist if querying them succeeds.
        let _: Vec<MemberModel> = Member::find().limit(1).all(&db).await?;
        let _: Vec<ItemModel> = Item::find().limit(1).all(&db).await?;
        let _: Vec<OrderModel> = Order::find().limit(1).all(&db).await?;
        let _ = FavoriteFood::find().limit(1).all(&db).await?;
        let _ = CategoryItem::find().limit(1).all(&db).await?;
        let _ = Child::find().limit(1).all(&db).await?;
        Ok(())
    }
}
