//! # Shipping Service
//!
//! Back-office core of a shipping company: branches, cities, merchants and
//! the pricing facts used to charge for every order.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Entities, the specification/query model, repositories and
//!   the unit of work
//! - **application**: Shipping charge calculation and paged listings
//! - **infrastructure**: Data stores (SeaORM database, in-memory)
//! - **shared**: Error taxonomy and pagination value objects

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod telemetry;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryStore, SeaOrmStore};
