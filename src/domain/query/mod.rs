//! Query building blocks shared by every repository
//!
//! - `Specification`: filter, ordering and page window for one entity type
//! - `Criteria`: filter tree; `Where` nodes carry translatable intent
//! - `evaluate`: the in-memory evaluator every store can fall back to
//! - `Listing`: paged listing specifications from request parameters

pub mod criteria;
pub mod evaluator;
pub mod listing;
pub mod specification;

pub use criteria::{Condition, Criteria, FieldValue, Operator, Predicate, Queryable};
pub use evaluator::{count_matching, evaluate};
pub use listing::Listing;
pub use specification::{Comparator, OrderRule, Specification};
