//! Application services

mod listing;
mod shipping_charge;

pub use listing::ListingService;
pub use shipping_charge::ShippingChargeService;
