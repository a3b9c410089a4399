//! SeaORM mappings for the pricing standard and charge types

use sea_orm::Set;

use crate::domain::{ChargeType, Standard};
use crate::infrastructure::database::entities::{charge_type, standard};
use crate::infrastructure::database::store::SeaOrmMapped;

impl SeaOrmMapped for Standard {
    type Db = standard::Entity;
    type Active = standard::ActiveModel;

    fn from_model(m: standard::Model) -> Self {
        Standard {
            id: m.id,
            standard_weight: m.standard_weight,
            kg_price: m.kg_price,
            village_price: m.village_price,
        }
    }

    fn to_active_model(&self) -> standard::ActiveModel {
        standard::ActiveModel {
            id: Set(self.id),
            standard_weight: Set(self.standard_weight),
            kg_price: Set(self.kg_price),
            village_price: Set(self.village_price),
        }
    }

    fn primary_key(id: &i32) -> i32 {
        *id
    }
}

impl SeaOrmMapped for ChargeType {
    type Db = charge_type::Entity;
    type Active = charge_type::ActiveModel;

    fn from_model(m: charge_type::Model) -> Self {
        ChargeType {
            id: m.id,
            name: m.name,
            extra_price: m.extra_price,
            delivery_days: m.delivery_days,
            is_active: m.is_active,
        }
    }

    fn to_active_model(&self) -> charge_type::ActiveModel {
        charge_type::ActiveModel {
            id: Set(self.id),
            name: Set(self.name.clone()),
            extra_price: Set(self.extra_price),
            delivery_days: Set(self.delivery_days),
            is_active: Set(self.is_active),
        }
    }

    fn primary_key(id: &i32) -> i32 {
        *id
    }
}
