//! Lifecycle cascade and orphan removal.
//!
//! `CascadeChildren` marks an owning entity whose children follow its
//! lifecycle: persisting the owner persists the children, removing the owner
//! removes them first, and detaching a child from its owner deletes the
//! orphaned row. Implemented for the parent/child demo pair and for
//! order/order-line, where lines never outlive their order.

use super::{Session, TrackedEntity};
use crate::entities::{child, order, order_item, parent};
use crate::errors::{Error, Result};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::debug;

/// An entity that owns the lifecycle of its children.
pub trait CascadeChildren: TrackedEntity {
    type Child: TrackedEntity;

    /// Points a child at its owner before a cascaded persist.
    fn assign_parent(child: &mut Self::Child, parent_id: i64);

    /// The owner a child currently points at.
    fn parent_of(child: &Self::Child) -> Option<i64>;

    /// All children of the given owner.
    async fn fetch_children<C: ConnectionTrait>(db: &C, parent_id: i64)
    -> Result<Vec<Self::Child>>;
}

impl CascadeChildren for parent::Model {
    type Child = child::Model;

    fn assign_parent(child: &mut child::Model, parent_id: i64) {
        child.parent_id = Some(parent_id);
    }

    fn parent_of(child: &child::Model) -> Option<i64> {
        child.parent_id
    }

    async fn fetch_children<C: ConnectionTrait>(
        db: &C,
        parent_id: i64,
    ) -> Result<Vec<child::Model>> {
        child::Entity::find()
            .filter(child::Column::ParentId.eq(parent_id))
            .all(db)
            .await
            .map_err(Into::into)
    }
}

impl CascadeChildren for order::Model {
    type Child = order_item::Model;

    fn assign_parent(line: &mut order_item::Model, order_id: i64) {
        line.order_id = order_id;
    }

    fn parent_of(line: &order_item::Model) -> Option<i64> {
        Some(line.order_id)
    }

    async fn fetch_children<C: ConnectionTrait>(
        db: &C,
        order_id: i64,
    ) -> Result<Vec<order_item::Model>> {
        order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(db)
            .await
            .map_err(Into::into)
    }
}

impl Session {
    /// Cascaded persist: the owner first, then every child pointed at the
    /// freshly generated key. Children enter the context as managed entities.
    pub async fn persist_with_children<P: CascadeChildren>(
        &mut self,
        owner: P,
        children: Vec<P::Child>,
    ) -> Result<(P, Vec<P::Child>)> {
        let owner = self.persist(owner).await?;
        let owner_id = owner.primary_key();

        let mut managed_children = Vec::with_capacity(children.len());
        for mut c in children {
            P::assign_parent(&mut c, owner_id);
            managed_children.push(self.persist(c).await?);
        }
        debug!(
            kind = P::KIND,
            id = owner_id,
            children = managed_children.len(),
            "cascade persist"
        );
        Ok((owner, managed_children))
    }

    /// Cascaded remove: queues removal of every child, then the owner, all
    /// write-behind.
    pub async fn remove_cascading<P: CascadeChildren>(&mut self, owner_id: i64) -> Result<()> {
        let children = P::fetch_children(self.transaction(), owner_id).await?;
        for c in children {
            let child_id = c.primary_key();
            self.ensure_managed::<P::Child>(child_id).await?;
            self.remove::<P::Child>(child_id)?;
        }
        self.ensure_managed::<P>(owner_id).await?;
        self.remove::<P>(owner_id)?;
        debug!(kind = P::KIND, id = owner_id, "cascade remove queued");
        Ok(())
    }

    /// Orphan removal: detaching a child from its owner deletes the child.
    /// Fails if the child does not actually belong to the owner.
    pub async fn remove_orphan<P: CascadeChildren>(
        &mut self,
        owner_id: i64,
        child_id: i64,
    ) -> Result<()> {
        let child = self
            .get::<P::Child>(child_id)
            .await?
            .ok_or(Error::NotManaged {
                kind: P::Child::KIND,
                id: child_id,
            })?;
        if P::parent_of(&child) != Some(owner_id) {
            return Err(Error::NotOwned {
                kind: P::Child::KIND,
                id: child_id,
                parent_id: owner_id,
            });
        }
        self.remove::<P::Child>(child_id)?;
        debug!(
            kind = P::Child::KIND,
            id = child_id,
            parent = owner_id,
            "orphan removal queued"
        );
        Ok(())
    }

    /// Loads an entity into the context if it is not already managed.
    async fn ensure_managed<M: TrackedEntity>(&mut self, id: i64) -> Result<()> {
        if self.contains::<M>(id) {
            return Ok(());
        }
        self.get::<M>(id)
            .await?
            .ok_or(Error::NotManaged { kind: M::KIND, id })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{Child, Parent};
    use crate::test_utils::setup_test_db;

    fn transient_parent(name: &str) -> parent::Model {
        parent::Model {
            id: 0,
            name: name.to_string(),
        }
    }

    fn transient_child(name: &str) -> child::Model {
        child::Model {
            id: 0,
            name: name.to_string(),
            parent_id: None,
        }
    }

    #[tokio::test]
    async fn test_cascade_persist_saves_children_with_owner() -> Result<()> {
        let db = setup_test_db().await?;
        let mut session = Session::begin(&db).await?;

        let (owner, children) = session
            .persist_with_children(
                transient_parent("family"),
                vec![transient_child("first"), transient_child("second")],
            )
            .await?;
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.parent_id == Some(owner.id)));
        session.commit().await?;

        let rows = Child::find().all(&db).await?;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|c| c.parent_id == Some(owner.id)));
        Ok(())
    }

    #[tokio::test]
    async fn test_cascade_remove_deletes_children_first() -> Result<()> {
        let db = setup_test_db().await?;
        let mut session = Session::begin(&db).await?;
        let (owner, _) = session
            .persist_with_children(
                transient_parent("family"),
                vec![transient_child("first"), transient_child("second")],
            )
            .await?;
        session.commit().await?;

        let mut session = Session::begin(&db).await?;
        session.remove_cascading::<parent::Model>(owner.id).await?;
        // Children + parent, all still write-behind.
        assert_eq!(session.pending_removals(), 3);
        session.commit().await?;

        assert!(Parent::find_by_id(owner.id).one(&db).await?.is_none());
        assert!(Child::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_orphan_removal_deletes_detached_child() -> Result<()> {
        let db = setup_test_db().await?;
        let mut session = Session::begin(&db).await?;
        let (owner, children) = session
            .persist_with_children(
                transient_parent("family"),
                vec![transient_child("kept"), transient_child("orphan")],
            )
            .await?;
        session.commit().await?;

        let orphan_id = children[1].id;
        let mut session = Session::begin(&db).await?;
        session
            .remove_orphan::<parent::Model>(owner.id, orphan_id)
            .await?;
        session.commit().await?;

        let remaining = Child::find().all(&db).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "kept");
        Ok(())
    }

    #[tokio::test]
    async fn test_orphan_removal_rejects_foreign_child() -> Result<()> {
        let db = setup_test_db().await?;
        let mut session = Session::begin(&db).await?;
        let (_, children_a) = session
            .persist_with_children(transient_parent("a"), vec![transient_child("of-a")])
            .await?;
        let (owner_b, _) = session
            .persist_with_children(transient_parent("b"), vec![transient_child("of-b")])
            .await?;

        let err = session
            .remove_orphan::<parent::Model>(owner_b.id, children_a[0].id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotOwned { kind: "child", .. }));
        session.rollback().await?;
        Ok(())
    }
}
