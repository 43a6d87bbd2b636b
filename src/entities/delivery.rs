//! Delivery entity - one-to-one counterpart of an order.

use crate::models::Address;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// Delivery database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery")]
pub struct Model {
    /// Unique identifier for the delivery
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Embedded destination address: city component
    pub city: String,
    /// Embedded destination address: street component
    pub street: String,
    /// Embedded destination address: zipcode component
    pub zipcode: String,
    /// Current status, stored as the enum name
    pub status: DeliveryStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum DeliveryStatus {
    #[sea_orm(string_value = "READY")]
    Ready,
    #[sea_orm(string_value = "SHIPPING")]
    Shipping,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The order this delivery fulfills (FK lives on the order side)
    #[sea_orm(has_one = "super::order::Entity")]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn address(&self) -> Address {
        Address::new(&self.city, &self.street, &self.zipcode)
    }
}
