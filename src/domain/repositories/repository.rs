//! Generic CRUD surface for one entity type

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::change::Change;
use super::store::{DataStore, Entity, StoredIn};
use super::unit_of_work::SessionState;
use super::DomainResult;
use crate::domain::query::Specification;
use crate::shared::errors::DomainError;

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Stages an insert; nothing is written until the unit of work saves.
    async fn add(&self, entity: T) -> DomainResult<()>;

    /// `Ok(None)` when no row has this id.
    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>>;

    /// Stages a full-entity update.
    async fn mark_for_update(&self, entity: T) -> DomainResult<()>;

    /// Stages a delete. Fails with `NotFound` when the id does not exist.
    async fn delete(&self, id: &T::Id) -> DomainResult<()>;

    async fn list_all(&self) -> DomainResult<Vec<T>>;

    async fn list(&self, spec: &Specification<T>) -> DomainResult<Vec<T>>;

    /// Rows matching the specification's criteria; ordering and paging are ignored.
    async fn count(&self, spec: &Specification<T>) -> DomainResult<usize>;

    async fn first_matching(&self, spec: &Specification<T>) -> DomainResult<Option<T>> {
        if spec.is_paginated() {
            return Ok(self.list(spec).await?.into_iter().next());
        }
        let mut first = spec.clone();
        first.set_pagination(0, 1);
        Ok(self.list(&first).await?.into_iter().next())
    }
}

/// Repository handed out by a [`UnitOfWork`](super::UnitOfWork).
///
/// Writes go to the unit of work's change log; reads hit the store directly.
/// Once the unit of work is disposed every call fails with `SessionClosed`.
pub struct SessionRepository<T, S: DataStore> {
    store: Arc<S>,
    session: Arc<SessionState<S>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S> SessionRepository<T, S>
where
    T: StoredIn<S>,
    S: DataStore,
{
    pub(crate) fn new(store: Arc<S>, session: Arc<SessionState<S>>) -> Self {
        Self {
            store,
            session,
            _entity: PhantomData,
        }
    }

    fn stage(&self, change: Change<T>) -> DomainResult<()> {
        self.session.stage(Box::new(change))
    }
}

#[async_trait]
impl<T, S> Repository<T> for SessionRepository<T, S>
where
    T: StoredIn<S>,
    S: DataStore,
{
    async fn add(&self, entity: T) -> DomainResult<()> {
        debug!(entity = T::NAME, id = %entity.id(), "Staging insert");
        self.stage(Change::Insert(entity))
    }

    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>> {
        self.session.ensure_open()?;
        T::fetch_by_id(&self.store, id).await
    }

    async fn mark_for_update(&self, entity: T) -> DomainResult<()> {
        debug!(entity = T::NAME, id = %entity.id(), "Staging update");
        self.stage(Change::Update(entity))
    }

    async fn delete(&self, id: &T::Id) -> DomainResult<()> {
        self.session.ensure_open()?;
        if T::fetch_by_id(&self.store, id).await?.is_none() {
            return Err(DomainError::not_found(T::NAME, "id", id));
        }
        debug!(entity = T::NAME, %id, "Staging delete");
        self.stage(Change::Delete(id.clone()))
    }

    async fn list_all(&self) -> DomainResult<Vec<T>> {
        self.session.ensure_open()?;
        T::fetch_all(&self.store).await
    }

    async fn list(&self, spec: &Specification<T>) -> DomainResult<Vec<T>> {
        self.session.ensure_open()?;
        T::fetch_matching(&self.store, spec).await
    }

    async fn count(&self, spec: &Specification<T>) -> DomainResult<usize> {
        self.session.ensure_open()?;
        T::count_matching(&self.store, spec).await
    }
}
