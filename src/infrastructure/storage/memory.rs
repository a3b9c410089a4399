//! In-memory data store implementation

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::query::Specification;
use crate::domain::{DataStore, DomainError, DomainResult, Entity, StoredIn};

trait AnyTable: Send + Sync {
    fn clone_table(&self) -> Box<dyn AnyTable>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Rows of one entity type, ordered by id.
struct Table<T: Entity> {
    rows: BTreeMap<T::Id, T>,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Entity> AnyTable for Table<T> {
    fn clone_table(&self) -> Box<dyn AnyTable> {
        Box::new(Table::<T> {
            rows: self.rows.clone(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type Tables = HashMap<TypeId, Box<dyn AnyTable>>;

fn table_mut<T: Entity>(tables: &mut Tables) -> DomainResult<&mut Table<T>> {
    tables
        .entry(TypeId::of::<T>())
        .or_insert_with(|| Box::new(Table::<T>::default()))
        .as_any_mut()
        .downcast_mut::<Table<T>>()
        .ok_or_else(|| DomainError::Persistence(format!("table type mismatch for {}", T::NAME)))
}

type Operation = Box<dyn FnOnce(&mut Tables) -> DomainResult<()> + Send>;

/// Writes collected for one commit of an [`InMemoryStore`].
#[derive(Default)]
pub struct MemoryTransaction {
    operations: Vec<Operation>,
}

impl MemoryTransaction {
    fn push(&mut self, op: impl FnOnce(&mut Tables) -> DomainResult<()> + Send + 'static) {
        self.operations.push(Box::new(op));
    }
}

/// In-memory store for development and testing.
///
/// Specifications are always evaluated in memory. A commit applies its
/// writes to a copy of the tables and swaps it in only if every write
/// succeeded.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts rows directly, bypassing any unit of work.
    pub fn seed<T: Entity>(&self, rows: impl IntoIterator<Item = T>) {
        let mut tables = self.write();
        if let Ok(table) = table_mut::<T>(&mut tables) {
            for row in rows {
                table.rows.insert(row.id(), row);
            }
        }
    }

    /// Simulates an unreachable store: every read and commit fails.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }

    pub fn len<T: Entity>(&self) -> usize {
        self.read()
            .get(&TypeId::of::<T>())
            .and_then(|t| t.as_any().downcast_ref::<Table<T>>())
            .map_or(0, |t| t.rows.len())
    }

    fn ensure_online(&self) -> DomainResult<()> {
        if self.offline.load(Ordering::Acquire) {
            Err(DomainError::Persistence("in-memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn rows<T: Entity>(&self) -> DomainResult<Vec<T>> {
        self.ensure_online()?;
        Ok(self
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|t| t.as_any().downcast_ref::<Table<T>>())
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    type Transaction = MemoryTransaction;

    async fn begin(&self) -> DomainResult<MemoryTransaction> {
        self.ensure_online()?;
        Ok(MemoryTransaction::default())
    }

    async fn commit(&self, tx: MemoryTransaction) -> DomainResult<()> {
        self.ensure_online()?;
        let mut tables = self.write();
        let mut working: Tables = tables
            .iter()
            .map(|(id, table)| (*id, table.clone_table()))
            .collect();
        let count = tx.operations.len();
        for op in tx.operations {
            op(&mut working)?;
        }
        *tables = working;
        debug!(operations = count, "In-memory transaction committed");
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> StoredIn<InMemoryStore> for T {
    async fn fetch_all(store: &InMemoryStore) -> DomainResult<Vec<T>> {
        store.rows::<T>()
    }

    async fn fetch_by_id(store: &InMemoryStore, id: &T::Id) -> DomainResult<Option<T>> {
        Ok(store.rows::<T>()?.into_iter().find(|row| &row.id() == id))
    }

    async fn fetch_matching(store: &InMemoryStore, spec: &Specification<T>) -> DomainResult<Vec<T>> {
        Ok(crate::domain::query::evaluate(store.rows::<T>()?, spec))
    }

    async fn insert(tx: &mut MemoryTransaction, entity: T) -> DomainResult<()> {
        tx.push(move |tables| {
            let table = table_mut::<T>(tables)?;
            let id = entity.id();
            if table.rows.contains_key(&id) {
                return Err(DomainError::Persistence(format!(
                    "{} {} already exists",
                    T::NAME,
                    id
                )));
            }
            table.rows.insert(id, entity);
            Ok(())
        });
        Ok(())
    }

    async fn update(tx: &mut MemoryTransaction, entity: T) -> DomainResult<()> {
        tx.push(move |tables| {
            let table = table_mut::<T>(tables)?;
            let id = entity.id();
            match table.rows.get_mut(&id) {
                Some(row) => {
                    *row = entity;
                    Ok(())
                }
                None => Err(DomainError::not_found(T::NAME, "id", id)),
            }
        });
        Ok(())
    }

    async fn delete(tx: &mut MemoryTransaction, id: T::Id) -> DomainResult<()> {
        tx.push(move |tables| {
            table_mut::<T>(tables)?
                .rows
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| DomainError::not_found(T::NAME, "id", &id))
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::query::Criteria;
    use crate::domain::Branch;

    fn branch(id: i32, name: &str) -> Branch {
        Branch {
            id,
            name: name.to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn seeded_rows_are_readable() {
        let store = InMemoryStore::new();
        store.seed(vec![branch(2, "Giza"), branch(1, "Cairo")]);

        let all = Branch::fetch_all(&store).await.unwrap();
        assert_eq!(all.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(store.len::<Branch>(), 2);

        let found = Branch::fetch_by_id(&store, &2).await.unwrap();
        assert_eq!(found.map(|b| b.name), Some("Giza".to_string()));
    }

    #[tokio::test]
    async fn matching_uses_evaluator() {
        let store = InMemoryStore::new();
        store.seed(vec![branch(1, "Cairo"), branch(2, "Giza"), branch(3, "New Cairo")]);

        let spec = Specification::with_criteria(Criteria::contains("name", "cairo"));
        let rows = Branch::fetch_matching(&store, &spec).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(Branch::count_matching(&store, &spec).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn commit_is_all_or_nothing() {
        let store = InMemoryStore::new();
        store.seed(vec![branch(1, "Cairo")]);

        let mut tx = store.begin().await.unwrap();
        <Branch as StoredIn<InMemoryStore>>::insert(&mut tx, branch(2, "Giza")).await.unwrap();
        // duplicate id fails the whole commit
        <Branch as StoredIn<InMemoryStore>>::insert(&mut tx, branch(1, "Cairo again")).await.unwrap();
        assert!(store.commit(tx).await.is_err());
        assert_eq!(store.len::<Branch>(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_missing_rows_fail() {
        let store = InMemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        <Branch as StoredIn<InMemoryStore>>::update(&mut tx, branch(9, "Nowhere")).await.unwrap();
        assert!(matches!(
            store.commit(tx).await,
            Err(DomainError::NotFound { entity: "Branch", .. })
        ));

        let mut tx = store.begin().await.unwrap();
        <Branch as StoredIn<InMemoryStore>>::delete(&mut tx, 9).await.unwrap();
        assert!(store.commit(tx).await.is_err());
    }

    #[tokio::test]
    async fn offline_store_fails_reads() {
        let store = InMemoryStore::new();
        store.set_offline(true);
        assert!(matches!(
            Branch::fetch_all(&store).await,
            Err(DomainError::Persistence(_))
        ));
        store.set_offline(false);
        assert!(Branch::fetch_all(&store).await.unwrap().is_empty());
    }
}
