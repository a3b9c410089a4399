//! Request-scoped unit of work
//!
//! Owns one logical session against a [`DataStore`], hands out exactly one
//! repository per entity type and commits every staged write in one store
//! transaction.

use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use tracing::{debug, error, info};

use super::change::PendingChange;
use super::repository::SessionRepository;
use super::store::{DataStore, StoredIn};
use super::DomainResult;
use crate::shared::errors::DomainError;

type StagedChanges<S> = Vec<Box<dyn PendingChange<S>>>;

/// Open/closed flag and change log shared with every repository of one unit of work.
pub(crate) struct SessionState<S: DataStore> {
    open: AtomicBool,
    staged: Mutex<StagedChanges<S>>,
}

impl<S: DataStore> SessionState<S> {
    fn new() -> Self {
        Self {
            open: AtomicBool::new(true),
            staged: Mutex::new(Vec::new()),
        }
    }

    fn staged(&self) -> MutexGuard<'_, StagedChanges<S>> {
        self.staged.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub(crate) fn ensure_open(&self) -> DomainResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(DomainError::SessionClosed)
        }
    }

    pub(crate) fn stage(&self, change: Box<dyn PendingChange<S>>) -> DomainResult<()> {
        self.ensure_open()?;
        self.staged().push(change);
        Ok(())
    }

    fn take_staged(&self) -> StagedChanges<S> {
        std::mem::take(&mut *self.staged())
    }

    fn pending(&self) -> usize {
        self.staged().len()
    }

    /// Returns `true` if this call closed the session.
    fn close(&self) -> bool {
        let was_open = self.open.swap(false, Ordering::AcqRel);
        self.staged().clear();
        was_open
    }
}

/// Unit of work over a data store.
///
/// ```ignore
/// let uow = UnitOfWork::new(store.clone());
/// let cities = uow.repository::<City>()?;
/// cities.add(city).await?;
/// uow.save().await?;
/// ```
///
/// The unit of work is `Open` from construction until [`dispose`](Self::dispose)
/// (or drop); afterwards every operation, including those on repositories it
/// handed out, fails with [`DomainError::SessionClosed`].
pub struct UnitOfWork<S: DataStore> {
    store: Arc<S>,
    session: Arc<SessionState<S>>,
    repositories: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl<S: DataStore> UnitOfWork<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            session: Arc::new(SessionState::new()),
            repositories: DashMap::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Number of writes staged since the last save.
    pub fn pending_changes(&self) -> usize {
        self.session.pending()
    }

    /// The repository for `T`, created on first request and cached for the
    /// lifetime of this unit of work. Repeated calls return the same instance.
    pub fn repository<T>(&self) -> DomainResult<Arc<SessionRepository<T, S>>>
    where
        T: StoredIn<S>,
    {
        self.session.ensure_open()?;

        let cached = self
            .repositories
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                debug!(entity = T::NAME, "Creating repository");
                Arc::new(SessionRepository::<T, S>::new(
                    self.store.clone(),
                    self.session.clone(),
                )) as Arc<dyn Any + Send + Sync>
            })
            .value()
            .clone();

        cached.downcast::<SessionRepository<T, S>>().map_err(|_| {
            DomainError::Persistence(format!("repository cache holds a foreign type for {}", T::NAME))
        })
    }

    /// Commits every staged write, across all repositories, in staging order
    /// inside one store transaction. Returns the number of applied writes.
    ///
    /// On failure the transaction is rolled back and the staged writes are
    /// discarded.
    pub async fn save(&self) -> DomainResult<usize> {
        self.session.ensure_open()?;

        let staged = self.session.take_staged();
        if staged.is_empty() {
            return Ok(0);
        }
        let count = staged.len();

        match self.commit(staged).await {
            Ok(()) => {
                metrics::counter!("unit_of_work_commits_total", "outcome" => "ok").increment(1);
                info!(changes = count, "Unit of work committed");
                Ok(count)
            }
            Err(e) => {
                metrics::counter!("unit_of_work_commits_total", "outcome" => "error").increment(1);
                error!(changes = count, error = %e, "Unit of work commit failed");
                Err(e)
            }
        }
    }

    async fn commit(&self, staged: StagedChanges<S>) -> DomainResult<()> {
        let mut tx = self.store.begin().await?;
        for change in staged {
            let description = change.describe();
            change.apply(&mut tx).await.map_err(|e| {
                debug!(change = %description, error = %e, "Staged change rejected");
                e
            })?;
        }
        self.store.commit(tx).await
    }

    /// Closes the unit of work, dropping cached repositories and any unsaved
    /// writes. Safe to call more than once.
    pub fn dispose(&self) {
        if self.session.close() {
            self.repositories.clear();
            debug!("Unit of work disposed");
        }
    }
}

impl<S: DataStore> Drop for UnitOfWork<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::{Branch, City, Repository, Specification};
    use crate::infrastructure::storage::InMemoryStore;

    fn branch(id: i32, name: &str) -> Branch {
        Branch {
            id,
            name: name.to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn city(id: i32, branch_id: i32) -> City {
        City {
            id,
            name: format!("City {}", id),
            branch_id,
            charge_price: Decimal::from(20),
            pickup_price: Decimal::from(5),
            is_active: true,
        }
    }

    fn uow() -> (Arc<InMemoryStore>, UnitOfWork<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (store.clone(), UnitOfWork::new(store))
    }

    #[test]
    fn one_repository_instance_per_type() {
        let (_, uow) = uow();
        let a = uow.repository::<Branch>().unwrap();
        let b = uow.repository::<Branch>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        // a different type gets its own instance
        let _cities = uow.repository::<City>().unwrap();
        assert!(Arc::ptr_eq(&a, &uow.repository::<Branch>().unwrap()));
    }

    #[test]
    fn concurrent_first_requests_share_one_instance() {
        let (_, uow) = uow();
        let repos: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| uow.repository::<Branch>().unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(repos.iter().all(|r| Arc::ptr_eq(r, &repos[0])));
    }

    #[tokio::test]
    async fn staged_writes_are_invisible_until_save() {
        let (store, uow) = uow();
        let branches = uow.repository::<Branch>().unwrap();

        branches.add(branch(1, "Cairo")).await.unwrap();
        assert_eq!(uow.pending_changes(), 1);
        assert!(branches.list_all().await.unwrap().is_empty());
        assert!(branches.find_by_id(&1).await.unwrap().is_none());

        assert_eq!(uow.save().await.unwrap(), 1);
        assert_eq!(uow.pending_changes(), 0);
        assert_eq!(store.len::<Branch>(), 1);
        assert!(branches.find_by_id(&1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn save_commits_every_repository_in_order() {
        let (store, uow) = uow();
        let branches = uow.repository::<Branch>().unwrap();
        let cities = uow.repository::<City>().unwrap();

        branches.add(branch(1, "Cairo")).await.unwrap();
        cities.add(city(10, 1)).await.unwrap();
        branches.mark_for_update(branch(1, "Cairo Main")).await.unwrap();

        assert_eq!(uow.save().await.unwrap(), 3);
        assert_eq!(store.len::<City>(), 1);
        let saved = branches.find_by_id(&1).await.unwrap().unwrap();
        assert_eq!(saved.name, "Cairo Main");
    }

    #[tokio::test]
    async fn save_without_changes_returns_zero() {
        let (_, uow) = uow();
        assert_eq!(uow.save().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_save_discards_staged_writes() {
        let (store, uow) = uow();
        store.seed(vec![branch(1, "Cairo")]);
        let branches = uow.repository::<Branch>().unwrap();

        branches.add(branch(2, "Giza")).await.unwrap();
        branches.add(branch(1, "Duplicate")).await.unwrap();
        assert!(matches!(uow.save().await, Err(DomainError::Persistence(_))));

        assert_eq!(uow.pending_changes(), 0);
        assert_eq!(store.len::<Branch>(), 1);
        assert_eq!(uow.save().await.unwrap(), 0);
        assert!(uow.is_open());
    }

    #[tokio::test]
    async fn delete_of_missing_row_is_not_found() {
        let (store, uow) = uow();
        store.seed(vec![branch(1, "Cairo")]);
        let branches = uow.repository::<Branch>().unwrap();

        assert!(matches!(
            branches.delete(&2).await,
            Err(DomainError::NotFound { entity: "Branch", .. })
        ));
        assert_eq!(uow.pending_changes(), 0);

        branches.delete(&1).await.unwrap();
        assert_eq!(uow.save().await.unwrap(), 1);
        assert_eq!(store.len::<Branch>(), 0);
    }

    #[tokio::test]
    async fn disposed_unit_of_work_rejects_everything() {
        let (_, uow) = uow();
        let branches = uow.repository::<Branch>().unwrap();
        branches.add(branch(1, "Cairo")).await.unwrap();

        uow.dispose();
        uow.dispose();
        assert!(!uow.is_open());
        assert_eq!(uow.pending_changes(), 0);

        assert!(matches!(
            uow.repository::<Branch>(),
            Err(DomainError::SessionClosed)
        ));
        assert!(matches!(uow.save().await, Err(DomainError::SessionClosed)));
        assert!(matches!(
            branches.list_all().await,
            Err(DomainError::SessionClosed)
        ));
        assert!(matches!(
            branches.add(branch(2, "Giza")).await,
            Err(DomainError::SessionClosed)
        ));
        assert!(matches!(
            branches.count(&Specification::new()).await,
            Err(DomainError::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn dropping_unit_of_work_closes_its_repositories() {
        let (store, uow) = uow();
        let branches = uow.repository::<Branch>().unwrap();
        branches.add(branch(1, "Cairo")).await.unwrap();

        drop(uow);
        assert!(matches!(
            branches.find_by_id(&1).await,
            Err(DomainError::SessionClosed)
        ));
        assert_eq!(store.len::<Branch>(), 0);
    }

    #[tokio::test]
    async fn first_matching_and_count() {
        let (store, uow) = uow();
        store.seed(vec![branch(1, "Cairo"), branch(2, "Giza"), branch(3, "Aswan")]);
        let branches = uow.repository::<Branch>().unwrap();

        let mut spec = Specification::new();
        spec.set_order_by_field("name");
        let first = branches.first_matching(&spec).await.unwrap().unwrap();
        assert_eq!(first.name, "Aswan");

        spec.set_pagination(1, 5);
        let first = branches.first_matching(&spec).await.unwrap().unwrap();
        assert_eq!(first.name, "Cairo");
        assert_eq!(branches.count(&spec).await.unwrap(), 3);
    }
}
