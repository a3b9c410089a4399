pub mod branch;
pub mod city;
pub mod merchant;
pub mod pricing;
pub mod query;
pub mod repositories;

// Re-export commonly used types
pub use branch::Branch;
pub use city::City;
pub use merchant::{Merchant, MerchantCityPrice};
pub use pricing::{
    ChargeBreakdown, ChargeType, DeliveryMode, OrderDraft, PaymentType, Standard,
};
pub use query::{Criteria, FieldValue, Listing, Queryable, Specification};
pub use repositories::{
    DataStore, DomainResult, Entity, Repository, SessionRepository, StoredIn, UnitOfWork,
};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
