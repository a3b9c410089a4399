//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_branches;
mod m20240601_000002_create_cities;
mod m20240601_000003_create_merchants;
mod m20240601_000004_create_pricing;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_branches::Migration),
            Box::new(m20240601_000002_create_cities::Migration),
            Box::new(m20240601_000003_create_merchants::Migration),
            Box::new(m20240601_000004_create_pricing::Migration),
        ]
    }
}
