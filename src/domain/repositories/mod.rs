//! Repository traits for the domain layer
//!
//! Contains:
//! - `Entity`, `DataStore`, `StoredIn`: what a backing store must provide
//! - `Repository`: the CRUD/query surface for one entity type
//! - `UnitOfWork`: request-scoped owner of one repository per entity type
//! - `DomainResult`: standard result type for domain operations

mod change;
pub mod repository;
pub mod store;
pub mod unit_of_work;

use crate::shared::errors::DomainError;

pub use repository::{Repository, SessionRepository};
pub use store::{DataStore, Entity, StoredIn};
pub use unit_of_work::UnitOfWork;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
