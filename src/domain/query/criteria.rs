//! Filter criteria: translatable conditions plus free-form predicates

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A value read from an entity field or used in a condition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Compares two values of compatible kinds. Integers and decimals compare
    /// numerically; any other mismatch is incomparable.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        use FieldValue::*;
        match (self, other) {
            (Null, Null) => Some(Ordering::Equal),
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Int(a), Int(b)) => Some(a.cmp(b)),
            (Decimal(a), Decimal(b)) => Some(a.cmp(b)),
            (Int(a), Decimal(b)) => Some(rust_decimal::Decimal::from(*a).cmp(b)),
            (Decimal(a), Int(b)) => Some(a.cmp(&rust_decimal::Decimal::from(*b))),
            (Text(a), Text(b)) => Some(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl<V: Into<FieldValue>> From<Option<V>> for FieldValue {
    fn from(v: Option<V>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Read access to named fields, used by the in-memory evaluator.
pub trait Queryable {
    /// Returns `None` when the entity has no field with that name.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Case-insensitive substring match on text fields.
    Contains,
}

/// One `field <op> value` clause a storage backend can translate.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: &'static str,
    pub op: Operator,
    pub value: FieldValue,
}

impl Condition {
    pub fn new(field: &'static str, op: Operator, value: impl Into<FieldValue>) -> Self {
        Self {
            field,
            op,
            value: value.into(),
        }
    }

    pub fn matches(&self, actual: &FieldValue) -> bool {
        if self.op == Operator::Contains {
            return match (actual, &self.value) {
                (FieldValue::Text(haystack), FieldValue::Text(needle)) => haystack
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                _ => false,
            };
        }

        let ord = actual.compare(&self.value);
        match self.op {
            Operator::Eq => ord == Some(Ordering::Equal),
            Operator::Ne => ord != Some(Ordering::Equal),
            Operator::Gt => ord == Some(Ordering::Greater),
            Operator::Gte => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
            Operator::Lt => ord == Some(Ordering::Less),
            Operator::Lte => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
            Operator::Contains => false,
        }
    }
}

pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Filter tree of a [`Specification`](super::Specification).
///
/// `Where` nodes describe their intent and can be pushed down to a store;
/// `Custom` nodes are closures and force in-memory evaluation.
pub enum Criteria<T> {
    Where(Condition),
    Custom(Predicate<T>),
    All(Vec<Criteria<T>>),
    Any(Vec<Criteria<T>>),
    Not(Box<Criteria<T>>),
}

impl<T> Clone for Criteria<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Where(c) => Self::Where(c.clone()),
            Self::Custom(p) => Self::Custom(Arc::clone(p)),
            Self::All(items) => Self::All(items.clone()),
            Self::Any(items) => Self::Any(items.clone()),
            Self::Not(inner) => Self::Not(inner.clone()),
        }
    }
}

impl<T> fmt::Debug for Criteria<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Where(c) => f.debug_tuple("Where").field(c).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::All(items) => f.debug_tuple("All").field(items).finish(),
            Self::Any(items) => f.debug_tuple("Any").field(items).finish(),
            Self::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
        }
    }
}

impl<T> Criteria<T> {
    pub fn eq(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self::Where(Condition::new(field, Operator::Eq, value))
    }

    pub fn ne(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self::Where(Condition::new(field, Operator::Ne, value))
    }

    pub fn gt(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self::Where(Condition::new(field, Operator::Gt, value))
    }

    pub fn gte(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self::Where(Condition::new(field, Operator::Gte, value))
    }

    pub fn lt(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self::Where(Condition::new(field, Operator::Lt, value))
    }

    pub fn lte(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self::Where(Condition::new(field, Operator::Lte, value))
    }

    pub fn contains(field: &'static str, text: impl Into<String>) -> Self {
        Self::Where(Condition::new(field, Operator::Contains, text.into()))
    }

    pub fn custom(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    pub fn and(self, other: Criteria<T>) -> Self {
        match self {
            Self::All(mut items) => {
                items.push(other);
                Self::All(items)
            }
            first => Self::All(vec![first, other]),
        }
    }

    pub fn or(self, other: Criteria<T>) -> Self {
        match self {
            Self::Any(mut items) => {
                items.push(other);
                Self::Any(items)
            }
            first => Self::Any(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// True when no node of the tree is a closure.
    pub fn is_translatable(&self) -> bool {
        match self {
            Self::Where(_) => true,
            Self::Custom(_) => false,
            Self::All(items) | Self::Any(items) => items.iter().all(Self::is_translatable),
            Self::Not(inner) => inner.is_translatable(),
        }
    }
}

impl<T: Queryable> Criteria<T> {
    pub fn matches(&self, item: &T) -> bool {
        match self {
            Self::Where(condition) => item
                .field(condition.field)
                .is_some_and(|actual| condition.matches(&actual)),
            Self::Custom(predicate) => predicate(item),
            Self::All(items) => items.iter().all(|c| c.matches(item)),
            Self::Any(items) => items.iter().any(|c| c.matches(item)),
            Self::Not(inner) => !inner.matches(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        weight: Decimal,
        active: bool,
    }

    impl Queryable for Row {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(self.name.into()),
                "weight" => Some(self.weight.into()),
                "is_active" => Some(self.active.into()),
                _ => None,
            }
        }
    }

    fn row() -> Row {
        Row {
            name: "Alexandria Hub",
            weight: Decimal::new(55, 1),
            active: true,
        }
    }

    #[test]
    fn contains_ignores_case() {
        assert!(Criteria::<Row>::contains("name", "hub").matches(&row()));
        assert!(Criteria::<Row>::contains("name", "ALEX").matches(&row()));
        assert!(!Criteria::<Row>::contains("name", "cairo").matches(&row()));
    }

    #[test]
    fn numeric_comparison_crosses_int_and_decimal() {
        assert!(Criteria::<Row>::gt("weight", 5).matches(&row()));
        assert!(Criteria::<Row>::lte("weight", 6).matches(&row()));
        assert!(!Criteria::<Row>::eq("weight", 5).matches(&row()));
    }

    #[test]
    fn unknown_field_never_matches() {
        assert!(!Criteria::<Row>::eq("missing", 1).matches(&row()));
    }

    #[test]
    fn composition() {
        let criteria = Criteria::<Row>::eq("is_active", true)
            .and(Criteria::contains("name", "hub"))
            .and(Criteria::custom(|r: &Row| r.weight > Decimal::ONE));
        assert!(criteria.matches(&row()));
        assert!(!criteria.is_translatable());
        assert!(!criteria.negate().matches(&row()));

        let either = Criteria::<Row>::eq("name", "x").or(Criteria::eq("is_active", true));
        assert!(either.matches(&row()));
        assert!(either.is_translatable());
    }
}
