//! Uninitialized entity references.
//!
//! A `LazyRef` stands in for an associated row that has not been loaded yet:
//! it knows only the key. The first `get` initializes it through a session —
//! which means a first-level cache hit costs no SQL — and the resolved model
//! is kept for later reads. A reference to a missing row surfaces as
//! `Error::BrokenReference` at initialization time, not at construction.

use super::{Session, TrackedEntity};
use crate::errors::{Error, Result};
use std::sync::OnceLock;

pub struct LazyRef<M: TrackedEntity> {
    id: i64,
    cell: OnceLock<M>,
}

impl<M: TrackedEntity> LazyRef<M> {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            cell: OnceLock::new(),
        }
    }

    /// The target key, available without initialization.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Initializes the reference through the session and returns the model.
    /// Repeat calls return the already-initialized value.
    pub async fn get(&self, session: &mut Session) -> Result<M> {
        if let Some(model) = self.cell.get() {
            return Ok(model.clone());
        }
        let model = session
            .get::<M>(self.id)
            .await?
            .ok_or(Error::BrokenReference {
                kind: M::KIND,
                id: self.id,
            })?;
        let _ = self.cell.set(model.clone());
        Ok(model)
    }
}

impl<M: TrackedEntity> From<i64> for LazyRef<M> {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}
