//! Element-collection table for a member's previous addresses.
//!
//! Stores the `Address` value type one row per entry. Like all value
//! collections here, the full column set forms the primary key and the rows
//! are replaced wholesale whenever the collection changes.

use crate::models::Address;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "address_history")]
pub struct Model {
    /// Owning member
    #[sea_orm(primary_key, auto_increment = false)]
    pub member_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub city: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub street: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub zipcode: String,
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

impl Model {
    pub fn address(&self) -> Address {
        Address::new(&self.city, &self.street, &self.zipcode)
    }

    pub fn from_address(member_id: i64, address: &Address) -> Self {
        Self {
            member_id,
            city: address.city.clone(),
            street: address.street.clone(),
            zipcode: address.zipcode.clone(),
        }
    }
}
