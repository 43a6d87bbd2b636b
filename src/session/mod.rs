//! Persistence context over a SeaORM transaction.
//!
//! A `Session` brackets one database transaction and tracks every entity it
//! loads or persists:
//!
//! - **first-level cache / identity map**: `get` consults the context before
//!   touching SQL, so repeated reads of the same key cost one SELECT and
//!   observe the same data for the life of the session;
//! - **dirty checking**: a JSON snapshot is taken when an entity becomes
//!   managed; `flush` compares current state against the snapshot and emits an
//!   UPDATE only for entities that actually changed;
//! - **write-behind**: `remove` queues its DELETE instead of executing it;
//!   queued work runs at `flush` (updates first, then removals) and the whole
//!   transaction becomes durable at `commit`;
//! - **lifecycle**: transient models enter the context via `persist` (which
//!   INSERTs immediately, because keys are database-generated and the new id
//!   must be observable right away), leave it via `detach`/`clear` without
//!   SQL, or via `remove` with a queued DELETE.
//!
//! Cascade persist/remove and orphan removal live in [`cascade`]; lazy
//! references in [`lazy`].

pub mod cascade;
pub mod lazy;
pub mod tracked;

pub use cascade::CascadeChildren;
pub use lazy::LazyRef;
pub use tracked::TrackedEntity;

use crate::errors::{Error, Result};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, instrument, trace};

/// Identity-map key: entity kind plus primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct EntityKey {
    kind: &'static str,
    id: i64,
}

type OpFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;
type UpdateFn = for<'a> fn(&'a DatabaseTransaction, &'a Value) -> OpFuture<'a>;
type DeleteFn = for<'a> fn(&'a DatabaseTransaction, i64) -> OpFuture<'a>;

fn update_thunk<'a, M: TrackedEntity>(
    txn: &'a DatabaseTransaction,
    current: &'a Value,
) -> OpFuture<'a> {
    Box::pin(async move {
        let model: M = serde_json::from_value(current.clone())?;
        model.update_all_columns(txn).await
    })
}

fn delete_thunk<'a, M: TrackedEntity>(txn: &'a DatabaseTransaction, id: i64) -> OpFuture<'a> {
    Box::pin(M::delete_by_id(txn, id))
}

/// One managed entity: load-time snapshot, current state, and the typed
/// UPDATE thunk used at flush time.
struct Slot {
    snapshot: Value,
    current: Value,
    update: UpdateFn,
}

/// A queued write-behind DELETE.
struct Removal {
    key: EntityKey,
    delete: DeleteFn,
}

/// SQL traffic counters, mostly for demos and tests asserting cache behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub selects: u64,
    pub cache_hits: u64,
    pub inserts: u64,
    pub updates: u64,
    pub deletes: u64,
}

pub struct Session {
    txn: DatabaseTransaction,
    context: HashMap<EntityKey, Slot>,
    removed: HashSet<EntityKey>,
    pending: Vec<Removal>,
    stats: SessionStats,
}

impl Session {
    /// Opens a session on a fresh transaction.
    pub async fn begin(db: &DatabaseConnection) -> Result<Self> {
        let txn = db.begin().await?;
        debug!("session opened");
        Ok(Self {
            txn,
            context: HashMap::new(),
            removed: HashSet::new(),
            pending: Vec::new(),
            stats: SessionStats::default(),
        })
    }

    /// Loads an entity by key, first-level cache first.
    ///
    /// Returns `None` without SQL for keys removed earlier in this session.
    pub async fn get<M: TrackedEntity>(&mut self, id: i64) -> Result<Option<M>> {
        let key = EntityKey { kind: M::KIND, id };
        if self.removed.contains(&key) {
            trace!(kind = key.kind, id, "get on removed key, no SQL");
            return Ok(None);
        }
        if let Some(slot) = self.context.get(&key) {
            self.stats.cache_hits += 1;
            trace!(kind = key.kind, id, "first-level cache hit");
            let model = serde_json::from_value(slot.current.clone())?;
            return Ok(Some(model));
        }
        self.stats.selects += 1;
        match M::fetch(&self.txn, id).await? {
            Some(model) => {
                self.manage(&model)?;
                Ok(Some(model))
            }
            None => Ok(None),
        }
    }

    /// Makes a transient entity managed.
    ///
    /// The INSERT runs immediately so the database-generated key is available
    /// to the caller; the returned model is the managed row, snapshot taken.
    #[instrument(skip(self, model), fields(kind = M::KIND))]
    pub async fn persist<M: TrackedEntity>(&mut self, model: M) -> Result<M> {
        self.stats.inserts += 1;
        let managed = model.insert(&self.txn).await?;
        debug!(id = managed.primary_key(), "persisted");
        self.manage(&managed)?;
        Ok(managed)
    }

    /// Mutates a managed entity in place. The change is only recorded in the
    /// context; dirty checking turns it into an UPDATE at the next flush.
    pub fn modify<M: TrackedEntity>(&mut self, id: i64, f: impl FnOnce(&mut M)) -> Result<M> {
        let key = EntityKey { kind: M::KIND, id };
        let slot = self
            .context
            .get_mut(&key)
            .ok_or(Error::NotManaged { kind: M::KIND, id })?;
        let mut model: M = serde_json::from_value(slot.current.clone())?;
        f(&mut model);
        slot.current = serde_json::to_value(&model)?;
        Ok(model)
    }

    /// Schedules a managed entity for deletion. The row disappears from the
    /// first-level cache immediately; the DELETE itself is write-behind.
    pub fn remove<M: TrackedEntity>(&mut self, id: i64) -> Result<()> {
        let key = EntityKey { kind: M::KIND, id };
        if self.context.remove(&key).is_none() {
            return Err(Error::NotManaged { kind: M::KIND, id });
        }
        self.removed.insert(key);
        self.pending.push(Removal {
            key,
            delete: delete_thunk::<M>,
        });
        debug!(kind = key.kind, id, "removal queued");
        Ok(())
    }

    /// Detaches one entity: it stays in the database but the session stops
    /// tracking it, so later changes to it are invisible to dirty checking.
    pub fn detach<M: TrackedEntity>(&mut self, id: i64) -> bool {
        self.context
            .remove(&EntityKey { kind: M::KIND, id })
            .is_some()
    }

    /// Detaches everything and drops queued removals.
    pub fn clear(&mut self) {
        self.context.clear();
        self.removed.clear();
        self.pending.clear();
        debug!("session cleared");
    }

    pub fn contains<M: TrackedEntity>(&self, id: i64) -> bool {
        self.context.contains_key(&EntityKey { kind: M::KIND, id })
    }

    /// Whether the managed entity differs from its load-time snapshot.
    pub fn is_dirty<M: TrackedEntity>(&self, id: i64) -> bool {
        self.context
            .get(&EntityKey { kind: M::KIND, id })
            .is_some_and(|slot| slot.current != slot.snapshot)
    }

    pub fn pending_removals(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Synchronizes the context with the database: dirty entities become
    /// UPDATEs (deterministic key order), then queued removals run in the
    /// order they were requested. The context itself is not cleared and
    /// snapshots are refreshed to the flushed state.
    pub async fn flush(&mut self) -> Result<()> {
        let Self {
            txn,
            context,
            pending,
            stats,
            ..
        } = self;

        let mut dirty: Vec<EntityKey> = context
            .iter()
            .filter(|(_, slot)| slot.current != slot.snapshot)
            .map(|(key, _)| *key)
            .collect();
        dirty.sort_unstable();

        for key in dirty {
            if let Some(slot) = context.get_mut(&key) {
                let update = slot.update;
                update(txn, &slot.current).await?;
                slot.snapshot = slot.current.clone();
                stats.updates += 1;
                debug!(kind = key.kind, id = key.id, "dirty entity updated");
            }
        }

        for removal in pending.drain(..) {
            (removal.delete)(txn, removal.key.id).await?;
            stats.deletes += 1;
            debug!(
                kind = removal.key.kind,
                id = removal.key.id,
                "write-behind DELETE applied"
            );
        }

        Ok(())
    }

    /// Flushes and commits the underlying transaction.
    pub async fn commit(mut self) -> Result<SessionStats> {
        self.flush().await?;
        self.txn.commit().await?;
        debug!(stats = ?self.stats, "session committed");
        Ok(self.stats)
    }

    /// Rolls the transaction back, discarding every pending change including
    /// already-executed INSERTs.
    pub async fn rollback(self) -> Result<()> {
        self.txn.rollback().await?;
        debug!("session rolled back");
        Ok(())
    }

    pub(crate) fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    fn manage<M: TrackedEntity>(&mut self, model: &M) -> Result<()> {
        let key = EntityKey {
            kind: M::KIND,
            id: model.primary_key(),
        };
        let value = serde_json::to_value(model)?;
        self.removed.remove(&key);
        self.context.insert(
            key,
            Slot {
                snapshot: value.clone(),
                current: value,
                update: update_thunk::<M>,
            },
        );
        Ok(())
    }
}
