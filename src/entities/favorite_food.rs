//! Element-collection table for a member's favorite foods.
//!
//! Value rows have no identity of their own: every column participates in the
//! primary key, so duplicates cannot be stored and the rows live and die with
//! the owning member (replace-on-write, see `core::member`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "favorite_food")]
pub struct Model {
    /// Owning member
    #[sea_orm(primary_key, auto_increment = false)]
    pub member_id: i64,
    /// The food value itself
    #[sea_orm(primary_key, auto_increment = false)]
    pub food_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
