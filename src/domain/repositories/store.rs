//! Contracts between the domain and a concrete data store

use std::fmt;
use std::hash::Hash;

use async_trait::async_trait;

use super::DomainResult;
use crate::domain::query::{count_matching, evaluate, Queryable, Specification};

/// A persisted domain record.
pub trait Entity: Queryable + Clone + fmt::Debug + Send + Sync + 'static {
    type Id: Clone + Eq + Ord + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static;

    /// Human-readable entity name, used in errors and logs.
    const NAME: &'static str;

    fn id(&self) -> Self::Id;
}

/// A backing store able to apply a batch of writes atomically.
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    type Transaction: Send;

    async fn begin(&self) -> DomainResult<Self::Transaction>;

    async fn commit(&self, tx: Self::Transaction) -> DomainResult<()>;
}

/// Persistence adapter for one entity type in one store.
///
/// Reads go to committed data. Writes only happen inside a store
/// transaction opened by [`UnitOfWork::save`](super::UnitOfWork::save).
#[async_trait]
pub trait StoredIn<S: DataStore>: Entity {
    async fn fetch_all(store: &S) -> DomainResult<Vec<Self>>;

    async fn fetch_by_id(store: &S, id: &Self::Id) -> DomainResult<Option<Self>>;

    /// Stores that cannot translate a specification use the in-memory evaluator.
    async fn fetch_matching(store: &S, spec: &Specification<Self>) -> DomainResult<Vec<Self>> {
        Ok(evaluate(Self::fetch_all(store).await?, spec))
    }

    async fn count_matching(store: &S, spec: &Specification<Self>) -> DomainResult<usize> {
        let rows = Self::fetch_all(store).await?;
        Ok(count_matching(&rows, spec))
    }

    async fn insert(tx: &mut S::Transaction, entity: Self) -> DomainResult<()>;

    async fn update(tx: &mut S::Transaction, entity: Self) -> DomainResult<()>;

    async fn delete(tx: &mut S::Transaction, id: Self::Id) -> DomainResult<()>;
}
