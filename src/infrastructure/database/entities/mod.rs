//! Database entities module

pub mod branch;
pub mod charge_type;
pub mod city;
pub mod merchant;
pub mod merchant_city_price;
pub mod standard;

pub use branch::Entity as Branch;
pub use charge_type::Entity as ChargeType;
pub use city::Entity as City;
pub use merchant::Entity as Merchant;
pub use merchant_city_price::Entity as MerchantCityPrice;
pub use standard::Entity as Standard;
