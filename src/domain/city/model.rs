//! City domain entity

use rust_decimal::Decimal;

use serde::Serialize;

use crate::domain::query::{Criteria, FieldValue, Listing, Queryable, Specification};
use crate::domain::repositories::Entity;

/// A delivery destination with its default prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub branch_id: i32,
    /// Base shipping charge for orders delivered to this city
    pub charge_price: Decimal,
    /// Default fee when the order is picked up from the merchant
    pub pickup_price: Decimal,
    pub is_active: bool,
}

impl Queryable for City {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "branch_id" => Some(self.branch_id.into()),
            "charge_price" => Some(self.charge_price.into()),
            "pickup_price" => Some(self.pickup_price.into()),
            "is_active" => Some(self.is_active.into()),
            _ => None,
        }
    }
}

impl Entity for City {
    type Id = i32;
    const NAME: &'static str = "City";

    fn id(&self) -> i32 {
        self.id
    }
}

impl Listing for City {
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];
}

pub struct CitySpecs;

impl CitySpecs {
    pub fn for_branch(branch_id: i32) -> Specification<City> {
        let mut spec = Specification::with_criteria(Criteria::eq("branch_id", branch_id));
        spec.set_order_by_field("name");
        spec
    }
}
