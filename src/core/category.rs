//! Category business logic: the self-referential tree and the many-to-many
//! item association.
//!
//! Attach/detach write the join table directly; traversal to items goes
//! through the `Related` path so the join is built by the ORM.

use crate::{
    entities::{Category, CategoryItem, Item, category, category_item, item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Creates a category; `parent_id` must reference an existing category.
pub async fn create_category(
    db: &DatabaseConnection,
    name: String,
    parent_id: Option<i64>,
) -> Result<category::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Category name cannot be empty".to_string(),
        });
    }
    if let Some(pid) = parent_id {
        Category::find_by_id(pid)
            .one(db)
            .await?
            .ok_or(Error::CategoryNotFound { id: pid })?;
    }

    let model = category::ActiveModel {
        name: Set(name.trim().to_string()),
        parent_id: Set(parent_id),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Root categories, ordered by name.
pub async fn get_root_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::ParentId.is_null())
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Direct children of a node in the tree.
pub async fn get_children(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::ParentId.eq(category_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Links an item into a category. Attaching twice is a no-op; the join row
/// is the primary key, so a second insert would be rejected anyway.
pub async fn attach_item(db: &DatabaseConnection, category_id: i64, item_id: i64) -> Result<()> {
    Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;
    Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound {
            name: item_id.to_string(),
        })?;

    let existing = CategoryItem::find_by_id((category_id, item_id)).one(db).await?;
    if existing.is_some() {
        debug!(category_id, item_id, "item already attached");
        return Ok(());
    }

    category_item::ActiveModel {
        category_id: Set(category_id),
        item_id: Set(item_id),
    }
    .insert(db)
    .await?;
    debug!(category_id, item_id, "item attached to category");
    Ok(())
}

/// Unlinks an item from a category. Detaching a missing link is a no-op.
pub async fn detach_item(db: &DatabaseConnection, category_id: i64, item_id: i64) -> Result<()> {
    CategoryItem::delete_by_id((category_id, item_id))
        .exec(db)
        .await?;
    debug!(category_id, item_id, "item detached from category");
    Ok(())
}

/// Items in a category, resolved through the join table by the ORM.
pub async fn get_items_in_category(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Vec<item::Model>> {
    let model = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;
    model
        .find_related(Item)
        .order_by_asc(item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The reverse traversal: every category an item is filed under.
pub async fn get_categories_of_item(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<Vec<category::Model>> {
    let model = Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound {
            name: item_id.to_string(),
        })?;
    model
        .find_related(Category)
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
