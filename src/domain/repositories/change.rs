//! Staged writes waiting for the next commit

use async_trait::async_trait;

use super::store::{DataStore, StoredIn};
use super::DomainResult;

pub(crate) enum Change<T: super::Entity> {
    Insert(T),
    Update(T),
    Delete(T::Id),
}

/// A type-erased staged write, replayed inside a store transaction.
#[async_trait]
pub(crate) trait PendingChange<S: DataStore>: Send {
    async fn apply(self: Box<Self>, tx: &mut S::Transaction) -> DomainResult<()>;

    fn describe(&self) -> String;
}

#[async_trait]
impl<S, T> PendingChange<S> for Change<T>
where
    S: DataStore,
    T: StoredIn<S>,
{
    async fn apply(self: Box<Self>, tx: &mut S::Transaction) -> DomainResult<()> {
        match *self {
            Change::Insert(entity) => T::insert(tx, entity).await,
            Change::Update(entity) => T::update(tx, entity).await,
            Change::Delete(id) => T::delete(tx, id).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Change::Insert(entity) => format!("insert {} {}", T::NAME, entity.id()),
            Change::Update(entity) => format!("update {} {}", T::NAME, entity.id()),
            Change::Delete(id) => format!("delete {} {}", T::NAME, id),
        }
    }
}
