//! Paged listings for back-office screens

use log::debug;

use crate::domain::{DataStore, DomainResult, Listing, Repository, StoredIn, UnitOfWork};
use crate::shared::pagination::{PaginatedResult, PaginationParams};

/// Service for paged, searchable listings of any [`Listing`] entity
pub struct ListingService<'a, S: DataStore> {
    uow: &'a UnitOfWork<S>,
}

impl<'a, S: DataStore> ListingService<'a, S> {
    pub fn new(uow: &'a UnitOfWork<S>) -> Self {
        Self { uow }
    }

    /// One page of `T` plus the number of matching rows across all pages.
    pub async fn page<T>(&self, params: &PaginationParams) -> DomainResult<PaginatedResult<T>>
    where
        T: StoredIn<S> + Listing,
    {
        let spec = T::listing(params);
        let repo = self.uow.repository::<T>()?;

        let items = repo.list(&spec).await?;
        let total_count = repo.count(&spec).await? as u64;

        debug!(
            "Listed {} page {} ({} of {} rows)",
            T::NAME,
            params.page_index(),
            items.len(),
            total_count
        );

        Ok(PaginatedResult::new(
            items,
            total_count,
            params.page_index(),
            params.page_size(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::{Branch, Merchant};
    use crate::infrastructure::storage::InMemoryStore;

    fn branches() -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        let names = [
            "Cairo", "Giza", "Alexandria", "New Cairo", "Luxor", "Aswan", "Tanta", "Mansoura",
            "Zagazig", "Suez", "Ismailia", "Port Said", "Cairo East",
        ];
        store.seed(names.iter().enumerate().map(|(i, name)| Branch {
            id: i as i32 + 1,
            name: name.to_string(),
            is_active: i % 4 != 3,
            created_at: Utc::now(),
        }));
        store
    }

    #[tokio::test]
    async fn pages_are_capped_and_counted() {
        let uow = UnitOfWork::new(branches());
        let service = ListingService::new(&uow);

        let first = service
            .page::<Branch>(&PaginationParams::new(1, 50))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.page_size, 10);
        assert_eq!(first.total_count, 13);
        assert_eq!(first.total_pages(), 2);
        assert_eq!(first.items[0].id, 1);

        let second = service
            .page::<Branch>(&PaginationParams::new(2, 10))
            .await
            .unwrap();
        assert_eq!(
            second.items.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![11, 12, 13]
        );
    }

    #[tokio::test]
    async fn search_sort_and_active_filter() {
        let uow = UnitOfWork::new(branches());
        let service = ListingService::new(&uow);

        let params = PaginationParams::new(1, 10)
            .with_search("  CAIRO ")
            .with_sort("name_desc");
        let page = service.page::<Branch>(&params).await.unwrap();
        let names: Vec<_> = page.items.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["New Cairo", "Cairo East", "Cairo"]);
        assert_eq!(page.total_count, 3);

        // "New Cairo" (id 4) is inactive
        let params = PaginationParams::new(1, 10)
            .with_search("cairo")
            .with_is_active(true);
        let page = service.page::<Branch>(&params).await.unwrap();
        assert_eq!(page.items.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 13]);
    }

    #[tokio::test]
    async fn sort_keys_and_default_order() {
        let uow = UnitOfWork::new(branches());
        let service = ListingService::new(&uow);
        let ids = |page: PaginatedResult<Branch>| page.items.iter().map(|b| b.id).collect::<Vec<_>>();

        let newest = PaginationParams::new(1, 3).with_sort("id_desc");
        assert_eq!(ids(service.page::<Branch>(&newest).await.unwrap()), vec![13, 12, 11]);

        let by_name = PaginationParams::new(1, 3).with_sort("name");
        let page = service.page::<Branch>(&by_name).await.unwrap();
        let names: Vec<_> = page.items.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Alexandria", "Aswan", "Cairo"]);

        let unsorted = PaginationParams::new(2, 3);
        assert_eq!(ids(service.page::<Branch>(&unsorted).await.unwrap()), vec![4, 5, 6]);

        let unknown = PaginationParams::new(1, 3).with_sort("created_at");
        assert_eq!(ids(service.page::<Branch>(&unknown).await.unwrap()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn merchant_search_covers_store_name() {
        let store = Arc::new(InMemoryStore::new());
        store.seed(vec![
            Merchant {
                id: 1,
                name: "Ahmed".into(),
                store_name: "Nile Books".into(),
                branch_id: 1,
                city_id: 1,
                special_pickup_price: None,
                is_active: true,
            },
            Merchant {
                id: 2,
                name: "Nile Traders".into(),
                store_name: "NT".into(),
                branch_id: 1,
                city_id: 1,
                special_pickup_price: Some(Decimal::from(3)),
                is_active: true,
            },
            Merchant {
                id: 3,
                name: "Sara".into(),
                store_name: "Delta Shop".into(),
                branch_id: 1,
                city_id: 1,
                special_pickup_price: None,
                is_active: true,
            },
        ]);
        let uow = UnitOfWork::new(store);

        let page = ListingService::new(&uow)
            .page::<Merchant>(&PaginationParams::new(1, 10).with_search("nile"))
            .await
            .unwrap();
        assert_eq!(page.items.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let uow = UnitOfWork::new(branches());
        let page = ListingService::new(&uow)
            .page::<Branch>(&PaginationParams::new(5, 10))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 13);
    }
}
