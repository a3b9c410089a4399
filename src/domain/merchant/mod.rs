//! Merchant aggregate
//!
//! Merchants and their per-city special prices.

pub mod model;

pub use model::{Merchant, MerchantCityPrice, MerchantSpecs};
