//! Merchant domain entities

use rust_decimal::Decimal;

use serde::Serialize;

use crate::domain::query::{Criteria, FieldValue, Listing, Queryable, Specification};
use crate::domain::repositories::Entity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Merchant {
    pub id: i32,
    pub name: String,
    pub store_name: String,
    pub branch_id: i32,
    pub city_id: i32,
    /// Overrides the city's pickup price for orders picked up from this merchant
    pub special_pickup_price: Option<Decimal>,
    pub is_active: bool,
}

impl Queryable for Merchant {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "store_name" => Some(self.store_name.as_str().into()),
            "branch_id" => Some(self.branch_id.into()),
            "city_id" => Some(self.city_id.into()),
            "special_pickup_price" => Some(self.special_pickup_price.into()),
            "is_active" => Some(self.is_active.into()),
            _ => None,
        }
    }
}

impl Entity for Merchant {
    type Id = i32;
    const NAME: &'static str = "Merchant";

    fn id(&self) -> i32 {
        self.id
    }
}

impl Listing for Merchant {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "store_name"];
}

/// Special base price a merchant pays for shipments to one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantCityPrice {
    pub id: i32,
    pub merchant_id: i32,
    pub city_id: i32,
    pub special_price: Decimal,
}

impl Queryable for MerchantCityPrice {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "merchant_id" => Some(self.merchant_id.into()),
            "city_id" => Some(self.city_id.into()),
            "special_price" => Some(self.special_price.into()),
            _ => None,
        }
    }
}

impl Entity for MerchantCityPrice {
    type Id = i32;
    const NAME: &'static str = "MerchantCityPrice";

    fn id(&self) -> i32 {
        self.id
    }
}

pub struct MerchantSpecs;

impl MerchantSpecs {
    pub fn for_branch(branch_id: i32) -> Specification<Merchant> {
        let mut spec = Specification::with_criteria(Criteria::eq("branch_id", branch_id));
        spec.set_order_by_field("name");
        spec
    }

    /// The special price row for one (merchant, city) pair, if any.
    pub fn special_price(merchant_id: i32, city_id: i32) -> Specification<MerchantCityPrice> {
        Specification::with_criteria(
            Criteria::eq("merchant_id", merchant_id).and(Criteria::eq("city_id", city_id)),
        )
    }

    pub fn special_prices_of(merchant_id: i32) -> Specification<MerchantCityPrice> {
        let mut spec = Specification::with_criteria(Criteria::eq("merchant_id", merchant_id));
        spec.set_order_by_field("city_id");
        spec
    }
}
