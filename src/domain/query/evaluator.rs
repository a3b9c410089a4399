//! In-memory execution of a [`Specification`]

use super::criteria::Queryable;
use super::specification::Specification;

/// Applies `spec` to `source` in a fixed order: filter, ascending sort,
/// descending sort, then skip/take.
///
/// Both sorts are stable, so when both orderings are set the descending key
/// wins and rows equal on it keep their ascending order.
pub fn evaluate<T, I>(source: I, spec: &Specification<T>) -> Vec<T>
where
    T: Queryable,
    I: IntoIterator<Item = T>,
{
    let mut rows: Vec<T> = match spec.criteria() {
        Some(criteria) => source.into_iter().filter(|r| criteria.matches(r)).collect(),
        None => source.into_iter().collect(),
    };

    if let Some(rule) = spec.order_by() {
        rows.sort_by(|a, b| rule.compare(a, b));
    }
    if let Some(rule) = spec.order_by_descending() {
        rows.sort_by(|a, b| rule.compare(b, a));
    }

    if spec.is_paginated() {
        rows.into_iter().skip(spec.skip()).take(spec.take()).collect()
    } else {
        rows
    }
}

/// Number of rows satisfying the specification's criteria, ignoring paging.
pub fn count_matching<'a, T, I>(source: I, spec: &Specification<T>) -> usize
where
    T: Queryable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    source.into_iter().filter(|r| spec.matches(r)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{Criteria, FieldValue};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        name: &'static str,
        group: i64,
    }

    impl Queryable for Row {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => Some(self.id.into()),
                "name" => Some(self.name.into()),
                "group" => Some(self.group.into()),
                _ => None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, name: "delta", group: 2 },
            Row { id: 2, name: "alpha", group: 1 },
            Row { id: 3, name: "charlie", group: 2 },
            Row { id: 4, name: "bravo", group: 1 },
            Row { id: 5, name: "echo", group: 3 },
        ]
    }

    fn ids(rows: &[Row]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn filter_keeps_source_order() {
        let spec = Specification::with_criteria(Criteria::eq("group", 2));
        assert_eq!(ids(&evaluate(rows(), &spec)), vec![1, 3]);
    }

    #[test]
    fn empty_spec_returns_everything() {
        assert_eq!(evaluate(rows(), &Specification::new()), rows());
    }

    #[test]
    fn ascending_by_field() {
        let mut spec = Specification::new();
        spec.set_order_by_field("name");
        assert_eq!(ids(&evaluate(rows(), &spec)), vec![2, 4, 3, 1, 5]);
    }

    #[test]
    fn descending_by_key() {
        let mut spec = Specification::new();
        spec.set_order_by_descending(|r: &Row| r.name);
        assert_eq!(ids(&evaluate(rows(), &spec)), vec![5, 1, 3, 4, 2]);
    }

    #[test]
    fn descending_overrides_ascending() {
        let mut spec = Specification::new();
        spec.set_order_by(|r: &Row| r.name)
            .set_order_by_descending(|r: &Row| r.group);
        // group desc decides; ties stay in name order
        assert_eq!(ids(&evaluate(rows(), &spec)), vec![5, 3, 1, 2, 4]);
    }

    #[test]
    fn pagination_after_filter_and_sort() {
        let mut spec = Specification::with_criteria(Criteria::ne("id", 5));
        spec.set_order_by_field("name").set_pagination(1, 2);
        // sorted: alpha(2), bravo(4), charlie(3), delta(1)
        assert_eq!(ids(&evaluate(rows(), &spec)), vec![4, 3]);
    }

    #[test]
    fn pagination_never_exceeds_take() {
        for skip in 0..7 {
            for take in 0..7 {
                let mut spec = Specification::new();
                spec.set_pagination(skip, take);
                let result = evaluate(rows(), &spec);
                assert!(result.len() <= take);
                let expected: Vec<Row> = rows().into_iter().skip(skip).take(take).collect();
                assert_eq!(result, expected);
            }
        }
    }

    #[test]
    fn evaluation_is_repeatable() {
        let source = rows();
        let mut spec = Specification::with_criteria(Criteria::gte("group", 2));
        spec.set_order_by_descending_field("id");
        let first = evaluate(source.clone(), &spec);
        let second = evaluate(source.clone(), &spec);
        assert_eq!(first, second);
        assert_eq!(source, rows());
    }

    #[test]
    fn count_ignores_paging() {
        let mut spec = Specification::with_criteria(Criteria::eq("group", 1));
        spec.set_pagination(0, 1);
        assert_eq!(count_matching(&rows(), &spec), 2);
    }
}
