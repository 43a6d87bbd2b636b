//! Item entity - the product catalog, mapped with single-table inheritance.
//!
//! Albums, books, and movies share one table. The `item_type` discriminator
//! column records the concrete subtype, and subtype-specific columns
//! (`artist`, `author`, `actor`) are nullable because they only apply to one
//! variant each. `Model::details` reassembles the typed view.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// Item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discriminator column distinguishing the concrete subtype
    pub item_type: ItemType,
    /// Display name
    pub name: String,
    /// Unit price in won
    pub price: i32,
    /// Units in stock
    pub stock_quantity: i32,
    /// Album only: performing artist
    pub artist: Option<String>,
    /// Book only: author
    pub author: Option<String>,
    /// Movie only: lead actor
    pub actor: Option<String>,
    /// Audit column: row creation time
    pub created_at: DateTimeUtc,
    /// Audit column: last modification time
    pub updated_at: Option<DateTimeUtc>,
}

/// Discriminator values, persisted as short strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ItemType {
    #[sea_orm(string_value = "album")]
    Album,
    #[sea_orm(string_value = "book")]
    Book,
    #[sea_orm(string_value = "movie")]
    Movie,
}

/// Typed view over the subtype columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemDetails {
    Album { artist: Option<String> },
    Book { author: Option<String> },
    Movie { actor: Option<String> },
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One item appears on many order lines
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
    /// Join-table rows linking this item into categories
    #[sea_orm(has_many = "super::category_item::Entity")]
    CategoryItems,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

// Many-to-many with category through the category_item join table.
impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_item::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_item::Relation::Item.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Projects the discriminator plus subtype columns into the typed view.
    pub fn details(&self) -> ItemDetails {
        match self.item_type {
            ItemType::Album => ItemDetails::Album {
                artist: self.artist.clone(),
            },
            ItemType::Book => ItemDetails::Book {
                author: self.author.clone(),
            },
            ItemType::Movie => ItemDetails::Movie {
                actor: self.actor.clone(),
            },
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}
