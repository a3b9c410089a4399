//! Paged listing specifications built from request parameters

use super::criteria::{Criteria, Queryable};
use super::specification::Specification;
use crate::shared::pagination::PaginationParams;

/// An entity that back-office screens list page by page.
///
/// The default [`listing`](Listing::listing) searches `SEARCH_FIELDS` with the
/// lower-cased search text, applies the optional `is_active` filter and maps
/// the sort key: `name`, `name_desc`, `id_desc`, anything else is `id`
/// ascending.
pub trait Listing: Queryable + Sized {
    const SEARCH_FIELDS: &'static [&'static str];

    fn listing(params: &PaginationParams) -> Specification<Self> {
        let mut spec = Specification::new();

        if !params.search().is_empty() {
            let search = Self::SEARCH_FIELDS
                .iter()
                .map(|field| Criteria::contains(*field, params.search()))
                .reduce(Criteria::or);
            if let Some(search) = search {
                spec.add_criteria(search);
            }
        }
        if let Some(is_active) = params.is_active() {
            spec.add_criteria(Criteria::eq("is_active", is_active));
        }

        match params.sort() {
            Some("name") => spec.set_order_by_field("name"),
            Some("name_desc") => spec.set_order_by_descending_field("name"),
            Some("id_desc") => spec.set_order_by_descending_field("id"),
            _ => spec.set_order_by_field("id"),
        };

        spec.set_pagination(params.skip(), params.take());
        spec
    }
}
