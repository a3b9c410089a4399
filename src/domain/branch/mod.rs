//! Branch aggregate

pub mod model;

pub use model::{Branch, BranchSpecs};
