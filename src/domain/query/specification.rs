//! Declarative query description: filter, ordering and page window

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::criteria::{Criteria, Queryable};

pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// How a specification orders its results.
pub enum OrderRule<T> {
    /// Order by a named field; translatable to the store's native ordering.
    Field(&'static str),
    /// Order by a key computed in memory.
    Key(Comparator<T>),
}

impl<T> Clone for OrderRule<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Field(name) => Self::Field(*name),
            Self::Key(cmp) => Self::Key(Arc::clone(cmp)),
        }
    }
}

impl<T> fmt::Debug for OrderRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Key(_) => f.write_str("Key(..)"),
        }
    }
}

impl<T: Queryable> OrderRule<T> {
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        match self {
            Self::Field(name) => a.field(name).cmp(&b.field(name)),
            Self::Key(cmp) => cmp(a, b),
        }
    }
}

fn key_comparator<T, K, F>(key: F) -> Comparator<T>
where
    T: 'static,
    K: Ord,
    F: Fn(&T) -> K + Send + Sync + 'static,
{
    Arc::new(move |a: &T, b: &T| key(a).cmp(&key(b)))
}

/// A query over one entity type.
///
/// Built once per query call through the `set_*` builders. Setting both
/// orderings is allowed: the evaluator sorts ascending first and then
/// descending, so the descending rule decides the final order and the
/// ascending rule only breaks ties.
pub struct Specification<T> {
    criteria: Option<Criteria<T>>,
    order_by: Option<OrderRule<T>>,
    order_by_descending: Option<OrderRule<T>>,
    is_paginated: bool,
    skip: usize,
    take: usize,
}

impl<T> Default for Specification<T> {
    fn default() -> Self {
        Self {
            criteria: None,
            order_by: None,
            order_by_descending: None,
            is_paginated: false,
            skip: 0,
            take: 0,
        }
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Self {
            criteria: self.criteria.clone(),
            order_by: self.order_by.clone(),
            order_by_descending: self.order_by_descending.clone(),
            is_paginated: self.is_paginated,
            skip: self.skip,
            take: self.take,
        }
    }
}

impl<T> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("criteria", &self.criteria)
            .field("order_by", &self.order_by)
            .field("order_by_descending", &self.order_by_descending)
            .field("is_paginated", &self.is_paginated)
            .field("skip", &self.skip)
            .field("take", &self.take)
            .finish()
    }
}

impl<T> Specification<T> {
    /// Matches every row.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_criteria(criteria: Criteria<T>) -> Self {
        Self {
            criteria: Some(criteria),
            ..Self::default()
        }
    }

    /// Shorthand for a specification filtered by a closure.
    pub fn filtered(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self::with_criteria(Criteria::custom(predicate))
    }

    pub fn criteria(&self) -> Option<&Criteria<T>> {
        self.criteria.as_ref()
    }

    pub fn order_by(&self) -> Option<&OrderRule<T>> {
        self.order_by.as_ref()
    }

    pub fn order_by_descending(&self) -> Option<&OrderRule<T>> {
        self.order_by_descending.as_ref()
    }

    pub fn is_paginated(&self) -> bool {
        self.is_paginated
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn take(&self) -> usize {
        self.take
    }

    /// Adds a clause to the filter, AND-ed with any existing criteria.
    pub fn add_criteria(&mut self, criteria: Criteria<T>) -> &mut Self {
        self.criteria = Some(match self.criteria.take() {
            Some(existing) => existing.and(criteria),
            None => criteria,
        });
        self
    }

    pub fn set_order_by<K, F>(&mut self, key: F) -> &mut Self
    where
        T: 'static,
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.order_by = Some(OrderRule::Key(key_comparator(key)));
        self
    }

    pub fn set_order_by_field(&mut self, field: &'static str) -> &mut Self {
        self.order_by = Some(OrderRule::Field(field));
        self
    }

    pub fn set_order_by_descending<K, F>(&mut self, key: F) -> &mut Self
    where
        T: 'static,
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.order_by_descending = Some(OrderRule::Key(key_comparator(key)));
        self
    }

    pub fn set_order_by_descending_field(&mut self, field: &'static str) -> &mut Self {
        self.order_by_descending = Some(OrderRule::Field(field));
        self
    }

    pub fn set_pagination(&mut self, skip: usize, take: usize) -> &mut Self {
        self.is_paginated = true;
        self.skip = skip;
        self.take = take;
        self
    }

    /// Same filter, no ordering or paging. Used to count a listing's total.
    pub fn count_only(&self) -> Self {
        Self {
            criteria: self.criteria.clone(),
            ..Self::default()
        }
    }

    /// True when a store can execute the whole specification natively.
    pub fn is_translatable(&self) -> bool {
        let filter_ok = self
            .criteria
            .as_ref()
            .map_or(true, Criteria::is_translatable);
        let order_ok = |rule: &Option<OrderRule<T>>| !matches!(rule, Some(OrderRule::Key(_)));
        filter_ok && order_ok(&self.order_by) && order_ok(&self.order_by_descending)
    }
}

impl<T: Queryable> Specification<T> {
    pub fn matches(&self, item: &T) -> bool {
        self.criteria.as_ref().map_or(true, |c| c.matches(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::FieldValue;

    #[derive(Debug)]
    struct Row(i64);

    impl Queryable for Row {
        fn field(&self, name: &str) -> Option<FieldValue> {
            (name == "n").then(|| self.0.into())
        }
    }

    #[test]
    fn pagination_sets_flag() {
        let mut spec = Specification::<Row>::new();
        assert!(!spec.is_paginated());
        spec.set_pagination(20, 10);
        assert!(spec.is_paginated());
        assert_eq!((spec.skip(), spec.take()), (20, 10));
    }

    #[test]
    fn add_criteria_ands_clauses() {
        let mut spec = Specification::<Row>::with_criteria(Criteria::gt("n", 1));
        spec.add_criteria(Criteria::lt("n", 5));
        assert!(spec.matches(&Row(3)));
        assert!(!spec.matches(&Row(7)));
    }

    #[test]
    fn count_only_drops_ordering_and_paging() {
        let mut spec = Specification::<Row>::with_criteria(Criteria::gt("n", 1));
        spec.set_order_by_field("n").set_pagination(5, 5);
        let count = spec.count_only();
        assert!(count.criteria().is_some());
        assert!(count.order_by().is_none());
        assert!(!count.is_paginated());
    }

    #[test]
    fn translatable_only_without_closures() {
        let mut spec = Specification::<Row>::with_criteria(Criteria::eq("n", 1));
        spec.set_order_by_field("n");
        assert!(spec.is_translatable());
        spec.set_order_by_descending(|r: &Row| r.0);
        assert!(!spec.is_translatable());
        assert!(!Specification::<Row>::filtered(|r| r.0 > 0).is_translatable());
    }

    #[test]
    fn empty_spec_matches_everything() {
        assert!(Specification::<Row>::new().matches(&Row(-1)));
    }
}
