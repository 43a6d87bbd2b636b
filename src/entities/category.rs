//! Category entity - a self-referential tree plus a many-to-many link to items.
//!
//! The tree is modeled with a nullable `parent_id` pointing back at the same
//! table. The item association goes through the `category_item` join table;
//! this side owns the join table in the sense that attach/detach operations in
//! `core::category` write to it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Parent category, None for roots
    pub parent_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Self-referential link to the parent category
    #[sea_orm(belongs_to = "Entity", from = "Column::ParentId", to = "Column::Id")]
    Parent,
    /// Join-table rows linking items into this category
    #[sea_orm(has_many = "super::category_item::Entity")]
    CategoryItems,
}

// Many-to-many with item through the category_item join table.
impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_item::Relation::Item.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_item::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
