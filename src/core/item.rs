//! Catalog business logic over the single-table item hierarchy.
//!
//! Subtype constructors set the discriminator and exactly one subtype column;
//! queries filter on the discriminator to get a homogeneous result set. Stock
//! changes go through an atomic column-expression update so concurrent orders
//! cannot lose decrements.

use crate::{
    config::catalog::CatalogConfig,
    entities::{Item, item},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, sea_query::Expr, prelude::*};
use tracing::{debug, info, warn};

/// Creates an album row (`item_type = album`, `artist` populated).
pub async fn create_album(
    db: &DatabaseConnection,
    name: String,
    price: i32,
    stock_quantity: i32,
    artist: Option<String>,
) -> Result<item::Model> {
    create_item(db, item::ItemType::Album, name, price, stock_quantity, artist, None, None).await
}

/// Creates a book row (`item_type = book`, `author` populated).
pub async fn create_book(
    db: &DatabaseConnection,
    name: String,
    price: i32,
    stock_quantity: i32,
    author: Option<String>,
) -> Result<item::Model> {
    create_item(db, item::ItemType::Book, name, price, stock_quantity, None, author, None).await
}

/// Creates a movie row (`item_type = movie`, `actor` populated).
pub async fn create_movie(
    db: &DatabaseConnection,
    name: String,
    price: i32,
    stock_quantity: i32,
    actor: Option<String>,
) -> Result<item::Model> {
    create_item(db, item::ItemType::Movie, name, price, stock_quantity, None, None, actor).await
}

#[allow(clippy::too_many_arguments)]
async fn create_item(
    db: &DatabaseConnection,
    item_type: item::ItemType,
    name: String,
    price: i32,
    stock_quantity: i32,
    artist: Option<String>,
    author: Option<String>,
    actor: Option<String>,
) -> Result<item::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Item name cannot be empty".to_string(),
        });
    }
    if price < 0 {
        return Err(Error::InvalidPrice { price });
    }
    if stock_quantity < 0 {
        return Err(Error::InvalidQuantity {
            count: stock_quantity,
        });
    }

    let model = item::ActiveModel {
        item_type: Set(item_type),
        name: Set(name.trim().to_string()),
        price: Set(price),
        stock_quantity: Set(stock_quantity),
        artist: Set(artist),
        author: Set(author),
        actor: Set(actor),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

pub async fn get_item_by_id(db: &DatabaseConnection, item_id: i64) -> Result<Option<item::Model>> {
    Item::find_by_id(item_id).one(db).await.map_err(Into::into)
}

pub async fn get_item_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<item::Model>> {
    Item::find()
        .filter(item::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All items of one concrete subtype, ordered by name. The discriminator
/// filter is what makes the shared table behave like per-subtype storage.
pub async fn list_items_by_type(
    db: &DatabaseConnection,
    item_type: item::ItemType,
) -> Result<Vec<item::Model>> {
    Item::find()
        .filter(item::Column::ItemType.eq(item_type))
        .order_by_asc(item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn list_all_items(db: &DatabaseConnection) -> Result<Vec<item::Model>> {
    Item::find()
        .order_by_asc(item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Atomically shifts an item's stock by `delta`
/// (`stock_quantity = stock_quantity + delta`).
///
/// Negative deltas are refused when they would take the stock below zero.
/// Works on a connection or an open transaction.
pub async fn adjust_stock<C>(db: &C, item_id: i64, delta: i32) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    let current = Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound {
            name: item_id.to_string(),
        })?;

    if delta < 0 && current.stock_quantity + delta < 0 {
        return Err(Error::InsufficientStock {
            item_id,
            available: current.stock_quantity,
            requested: -delta,
        });
    }

    Item::update_many()
        .col_expr(
            item::Column::StockQuantity,
            Expr::col(item::Column::StockQuantity).add(delta),
        )
        .col_expr(
            item::Column::UpdatedAt,
            Expr::value(Some(chrono::Utc::now())),
        )
        .filter(item::Column::Id.eq(item_id))
        .exec(db)
        .await?;

    Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound {
            name: item_id.to_string(),
        })
}

/// Seeds the catalog from `catalog.toml`, skipping names that already exist
/// so repeated startups do not duplicate items.
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<usize> {
    info!(
        albums = config.albums.len(),
        books = config.books.len(),
        movies = config.movies.len(),
        "seeding catalog"
    );

    let mut inserted = 0;
    for seed in &config.albums {
        if get_item_by_name(db, &seed.name).await?.is_some() {
            warn!(name = %seed.name, "catalog item already exists, skipping");
            continue;
        }
        create_album(db, seed.name.clone(), seed.price, seed.stock, seed.artist.clone()).await?;
        inserted += 1;
    }
    for seed in &config.books {
        if get_item_by_name(db, &seed.name).await?.is_some() {
            warn!(name = %seed.name, "catalog item already exists, skipping");
            continue;
        }
        create_book(db, seed.name.clone(), seed.price, seed.stock, seed.author.clone()).await?;
        inserted += 1;
    }
    for seed in &config.movies {
        if get_item_by_name(db, &seed.name).await?.is_some() {
            warn!(name = %seed.name, "catalog item already exists, skipping");
            continue;
        }
        create_movie(db, seed.name.clone(), seed.price, seed.stock, seed.actor.clone()).await?;
        inserted += 1;
    }

    debug!(inserted, "catalog seeding finished");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::catalog::{AlbumSeed, BookSeed};
    use crate::entities::{ItemDetails, ItemType};
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_subtype_constructors_set_discriminator() -> Result<()> {
        let db = setup_test_db().await?;

        let album =
            create_album(&db, "The Wall".to_string(), 25000, 5, Some("Pink Floyd".to_string()))
                .await?;
        assert_eq!(album.item_type, ItemType::Album);
        assert_eq!(
            album.details(),
            ItemDetails::Album {
                artist: Some("Pink Floyd".to_string())
            }
        );
        assert!(album.author.is_none() && album.actor.is_none());

        let book = create_book(&db, "SQL".to_string(), 30000, 3, Some("Date".to_string())).await?;
        assert_eq!(book.item_type, ItemType::Book);

        let movie =
            create_movie(&db, "Alien".to_string(), 12000, 7, Some("Weaver".to_string())).await?;
        assert_eq!(movie.item_type, ItemType::Movie);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_item_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_album(&db, "  ".to_string(), 100, 1, None).await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        let result = create_book(&db, "b".to_string(), -1, 1, None).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { price: -1 }));

        let result = create_movie(&db, "m".to_string(), 1, -2, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidQuantity { count: -2 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_items_by_type_filters_on_discriminator() -> Result<()> {
        let db = setup_test_db().await?;
        create_album(&db, "a1".to_string(), 1000, 1, None).await?;
        create_album(&db, "a2".to_string(), 1000, 1, None).await?;
        create_book(&db, "b1".to_string(), 1000, 1, None).await?;

        let albums = list_items_by_type(&db, ItemType::Album).await?;
        assert_eq!(albums.len(), 2);
        assert!(albums.iter().all(|i| i.item_type == ItemType::Album));

        let movies = list_items_by_type(&db, ItemType::Movie).await?;
        assert!(movies.is_empty());

        assert_eq!(list_all_items(&db).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_adjust_stock_atomic() -> Result<()> {
        let db = setup_test_db().await?;
        let item = create_book(&db, "b".to_string(), 1000, 10, None).await?;

        let after = adjust_stock(&db, item.id, -4).await?;
        assert_eq!(after.stock_quantity, 6);
        assert!(after.updated_at.is_some());

        let after = adjust_stock(&db, item.id, 2).await?;
        assert_eq!(after.stock_quantity, 8);

        let err = adjust_stock(&db, item.id, -9).await.unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientStock {
                available: 8,
                requested: 9,
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_catalog_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config = CatalogConfig {
            albums: vec![AlbumSeed {
                name: "The Wall".to_string(),
                price: 25000,
                stock: 5,
                artist: Some("Pink Floyd".to_string()),
            }],
            books: vec![BookSeed {
                name: "SQL".to_string(),
                price: 30000,
                stock: 3,
                author: None,
            }],
            movies: vec![],
        };

        assert_eq!(seed_catalog(&db, &config).await?, 2);
        assert_eq!(seed_catalog(&db, &config).await?, 0);
        assert_eq!(list_all_items(&db).await?.len(), 2);
        Ok(())
    }
}
