//! Pricing domain entities

use rust_decimal::Decimal;

use serde::Serialize;

use crate::domain::query::{Criteria, FieldValue, Listing, Queryable, Specification};
use crate::domain::repositories::Entity;

/// Global pricing KPI. A single row is expected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standard {
    pub id: i32,
    /// Weight (kg) included in the base charge
    pub standard_weight: Decimal,
    /// Price per kg above `standard_weight`
    pub kg_price: Decimal,
    /// Flat surcharge for village deliveries
    pub village_price: Decimal,
}

impl Standard {
    /// Surcharge for the weight above the standard threshold; zero at or below it.
    pub fn overweight_fee(&self, weight: Decimal) -> Decimal {
        if weight > self.standard_weight {
            (weight - self.standard_weight) * self.kg_price
        } else {
            Decimal::ZERO
        }
    }
}

impl Queryable for Standard {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "standard_weight" => Some(self.standard_weight.into()),
            "kg_price" => Some(self.kg_price.into()),
            "village_price" => Some(self.village_price.into()),
            _ => None,
        }
    }
}

impl Entity for Standard {
    type Id = i32;
    const NAME: &'static str = "Standard";

    fn id(&self) -> i32 {
        self.id
    }
}

/// Shipping service level (e.g. "Express") with its flat fee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeType {
    pub id: i32,
    pub name: String,
    pub extra_price: Decimal,
    /// Promised delivery time in days
    pub delivery_days: i32,
    pub is_active: bool,
}

impl Queryable for ChargeType {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "extra_price" => Some(self.extra_price.into()),
            "delivery_days" => Some(self.delivery_days.into()),
            "is_active" => Some(self.is_active.into()),
            _ => None,
        }
    }
}

impl Entity for ChargeType {
    type Id = i32;
    const NAME: &'static str = "ChargeType";

    fn id(&self) -> i32 {
        self.id
    }
}

impl Listing for ChargeType {
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];
}

pub struct ChargeTypeSpecs;

impl ChargeTypeSpecs {
    /// Active charge types, fastest first.
    pub fn active_by_speed() -> Specification<ChargeType> {
        let mut spec = Specification::with_criteria(Criteria::eq("is_active", true));
        spec.set_order_by_field("delivery_days");
        spec
    }
}

/// How the order reaches the shipping company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// The merchant drops the order at a branch
    #[default]
    BranchDelivery,
    /// A representative picks the order up from the merchant
    MerchantPickup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentType {
    #[default]
    CashOnDelivery,
    PaidInAdvance,
    Exchange,
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CashOnDelivery => write!(f, "CashOnDelivery"),
            Self::PaidInAdvance => write!(f, "PaidInAdvance"),
            Self::Exchange => write!(f, "Exchange"),
        }
    }
}

/// A candidate order to be priced.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub city_id: i32,
    pub merchant_id: i32,
    pub charge_type_id: i32,
    /// Total weight in kg
    pub total_weight: Decimal,
    pub ships_to_village: bool,
    pub delivery_mode: DeliveryMode,
    /// Price of the goods themselves
    pub order_price: Decimal,
    pub payment_type: PaymentType,
}

impl OrderDraft {
    /// Amount the representative collects from the customer on delivery.
    pub fn amount_received_at_delivery(&self) -> Decimal {
        match self.payment_type {
            PaymentType::CashOnDelivery => self.order_price,
            PaymentType::PaidInAdvance | PaymentType::Exchange => Decimal::ZERO,
        }
    }
}

/// Components of a shipping charge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChargeBreakdown {
    /// City price or the merchant's special price for that city
    pub base_price: Decimal,
    pub village_fee: Decimal,
    pub overweight_fee: Decimal,
    pub pickup_fee: Decimal,
    pub charge_type_fee: Decimal,
    pub total: Decimal,
}

impl ChargeBreakdown {
    pub fn new(
        base_price: Decimal,
        village_fee: Decimal,
        overweight_fee: Decimal,
        pickup_fee: Decimal,
        charge_type_fee: Decimal,
    ) -> Self {
        Self {
            base_price,
            village_fee,
            overweight_fee,
            pickup_fee,
            charge_type_fee,
            total: base_price + village_fee + overweight_fee + pickup_fee + charge_type_fee,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> Standard {
        Standard {
            id: 1,
            standard_weight: Decimal::from(5),
            kg_price: Decimal::from(5),
            village_price: Decimal::from(15),
        }
    }

    fn draft(payment_type: PaymentType) -> OrderDraft {
        OrderDraft {
            city_id: 1,
            merchant_id: 1,
            charge_type_id: 1,
            total_weight: Decimal::from(3),
            ships_to_village: false,
            delivery_mode: DeliveryMode::BranchDelivery,
            order_price: Decimal::new(25050, 2),
            payment_type,
        }
    }

    #[test]
    fn no_overweight_fee_at_threshold() {
        assert_eq!(standard().overweight_fee(Decimal::from(5)), Decimal::ZERO);
        assert_eq!(standard().overweight_fee(Decimal::from(1)), Decimal::ZERO);
    }

    #[test]
    fn overweight_fee_per_extra_kg() {
        assert_eq!(standard().overweight_fee(Decimal::from(7)), Decimal::from(10));
        // 5.5 kg → 0.5 * 5
        assert_eq!(standard().overweight_fee(Decimal::new(55, 1)), Decimal::new(25, 1));
    }

    #[test]
    fn cash_on_delivery_collects_order_price() {
        assert_eq!(
            draft(PaymentType::CashOnDelivery).amount_received_at_delivery(),
            Decimal::new(25050, 2)
        );
    }

    #[test]
    fn prepaid_and_exchange_collect_nothing() {
        assert_eq!(draft(PaymentType::PaidInAdvance).amount_received_at_delivery(), Decimal::ZERO);
        assert_eq!(draft(PaymentType::Exchange).amount_received_at_delivery(), Decimal::ZERO);
    }

    #[test]
    fn breakdown_sums_components() {
        let bd = ChargeBreakdown::new(
            Decimal::from(20),
            Decimal::from(15),
            Decimal::from(10),
            Decimal::ZERO,
            Decimal::from(8),
        );
        assert_eq!(bd.total, Decimal::from(53));
    }

    #[test]
    fn payment_type_display() {
        assert_eq!(PaymentType::CashOnDelivery.to_string(), "CashOnDelivery");
        assert_eq!(PaymentType::Exchange.to_string(), "Exchange");
    }
}
