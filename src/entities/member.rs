//! Member entity - a customer of the shop.
//!
//! Embeds the `Address` and `Period` value types as flattened columns and
//! carries the shared audit columns (`created_at`/`updated_at`). The
//! `favorite_food` and `address_history` element collections live in their own
//! tables keyed by `member_id`.

use crate::models::{Address, Period};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    /// Unique identifier for the member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Age in years, if known
    pub age: Option<i32>,
    /// Role of the member, stored as the enum name
    pub role: RoleType,
    /// Embedded address: city component
    pub city: Option<String>,
    /// Embedded address: street component
    pub street: Option<String>,
    /// Embedded address: zipcode component
    pub zipcode: Option<String>,
    /// Embedded membership period: start
    pub started_at: Option<DateTimeUtc>,
    /// Embedded membership period: end, None while the membership is open
    pub ended_at: Option<DateTimeUtc>,
    /// Audit column: row creation time
    pub created_at: DateTimeUtc,
    /// Audit column: last modification time
    pub updated_at: Option<DateTimeUtc>,
}

/// Member role, persisted by name rather than ordinal so reordering the
/// variants can never corrupt stored rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RoleType {
    #[sea_orm(string_value = "USER")]
    User,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One member places many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    /// Element collection of favorite foods
    #[sea_orm(has_many = "super::favorite_food::Entity")]
    FavoriteFoods,
    /// Element collection of previous addresses
    #[sea_orm(has_many = "super::address_history::Entity")]
    AddressHistory,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::favorite_food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteFoods.def()
    }
}

impl Related<super::address_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AddressHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Reassembles the embedded address, if all components are present.
    pub fn address(&self) -> Option<Address> {
        match (&self.city, &self.street, &self.zipcode) {
            (Some(city), Some(street), Some(zipcode)) => {
                Some(Address::new(city, street, zipcode))
            }
            _ => None,
        }
    }

    /// Reassembles the embedded membership period.
    pub fn period(&self) -> Period {
        Period {
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }
}
