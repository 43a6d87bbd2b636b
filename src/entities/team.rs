//! Team entity - the "one" side of the team/developer association.
//!
//! The foreign key lives on `developer`, so that side owns the association;
//! this side only reads it back via the relation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Team database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team")]
pub struct Model {
    /// Unique identifier for the team
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One team has many developers
    #[sea_orm(has_many = "super::developer::Entity")]
    Developers,
}

impl Related<super::developer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Developers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
