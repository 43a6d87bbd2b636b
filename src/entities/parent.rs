//! Parent entity - owner of the cascade / orphan-removal demo pair.
//!
//! Children follow the parent's lifecycle: persisting a parent through the
//! session cascades to its children, and removing a child from the parent
//! deletes the orphaned row (see `session::cascade`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Parent database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parent")]
pub struct Model {
    /// Unique identifier for the parent
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One parent has many children
    #[sea_orm(has_many = "super::child::Entity")]
    Children,
}

impl Related<super::child::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Children.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
