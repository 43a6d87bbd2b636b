//! Session-facing view of an entity: a stable kind name, an `i64` key, and the
//! four SQL primitives the persistence context needs.
//!
//! Implementations are generated by `impl_tracked!` for every entity with a
//! single auto-increment key. Element-collection and join tables have
//! composite keys and are deliberately not tracked; they are value rows owned
//! by their parent and handled in `core`.

use crate::errors::Result;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, EntityTrait, IntoActiveModel};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// An entity model the `Session` can manage.
pub trait TrackedEntity: Clone + Serialize + DeserializeOwned + Sized + 'static {
    /// Stable name used in identity-map keys, log lines, and error messages.
    const KIND: &'static str;

    /// Primary-key value; `0` by convention for transient instances.
    fn primary_key(&self) -> i64;

    /// SELECT by primary key.
    async fn fetch<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>>;

    /// INSERT with a database-generated key; returns the managed row.
    async fn insert<C: ConnectionTrait>(self, db: &C) -> Result<Self>;

    /// UPDATE every non-key column from this model's current values.
    async fn update_all_columns<C: ConnectionTrait>(&self, db: &C) -> Result<()>;

    /// DELETE by primary key.
    async fn delete_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<()>;
}

macro_rules! impl_tracked {
    ($model:ty, $entity:ty, $kind:literal) => {
        impl TrackedEntity for $model {
            const KIND: &'static str = $kind;

            fn primary_key(&self) -> i64 {
                self.id
            }

            async fn fetch<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>> {
                <$entity>::find_by_id(id).one(db).await.map_err(Into::into)
            }

            async fn insert<C: ConnectionTrait>(self, db: &C) -> Result<Self> {
                let mut active = self.into_active_model();
                // The key is database-generated; a transient model carries 0 here.
                active.id = ActiveValue::NotSet;
                active.insert(db).await.map_err(Into::into)
            }

            async fn update_all_columns<C: ConnectionTrait>(&self, db: &C) -> Result<()> {
                let active = self.clone().into_active_model().reset_all();
                active.update(db).await?;
                Ok(())
            }

            async fn delete_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<()> {
                <$entity>::delete_by_id(id).exec(db).await?;
                Ok(())
            }
        }
    };
}

use crate::entities;

impl_tracked!(entities::member::Model, entities::Member, "member");
impl_tracked!(entities::item::Model, entities::Item, "item");
impl_tracked!(entities::order::Model, entities::Order, "order");
impl_tracked!(entities::order_item::Model, entities::OrderItem, "order_item");
impl_tracked!(entities::delivery::Model, entities::Delivery, "delivery");
impl_tracked!(entities::category::Model, entities::Category, "category");
impl_tracked!(entities::team::Model, entities::Team, "team");
impl_tracked!(entities::developer::Model, entities::Developer, "developer");
impl_tracked!(entities::parent::Model, entities::Parent, "parent");
impl_tracked!(entities::child::Model, entities::Child, "child");
