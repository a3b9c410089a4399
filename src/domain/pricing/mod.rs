//! Pricing aggregate
//!
//! Global standard, charge types, order drafts and the charge breakdown.

pub mod model;

pub use model::{
    ChargeBreakdown, ChargeType, ChargeTypeSpecs, DeliveryMode, OrderDraft, PaymentType, Standard,
};
