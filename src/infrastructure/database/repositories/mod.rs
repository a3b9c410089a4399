//! Database repository mappings
//!
//! One `SeaOrmMapped` impl per aggregate; the generic store does the rest.

mod branch_repository;
mod city_repository;
mod merchant_repository;
mod pricing_repository;
