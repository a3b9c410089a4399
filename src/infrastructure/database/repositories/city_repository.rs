//! SeaORM mapping for cities

use sea_orm::Set;

use crate::domain::City;
use crate::infrastructure::database::entities::city;
use crate::infrastructure::database::store::SeaOrmMapped;

impl SeaOrmMapped for City {
    type Db = city::Entity;
    type Active = city::ActiveModel;

    fn from_model(m: city::Model) -> Self {
        City {
            id: m.id,
            name: m.name,
            branch_id: m.branch_id,
            charge_price: m.charge_price,
            pickup_price: m.pickup_price,
            is_active: m.is_active,
        }
    }

    fn to_active_model(&self) -> city::ActiveModel {
        city::ActiveModel {
            id: Set(self.id),
            name: Set(self.name.clone()),
            branch_id: Set(self.branch_id),
            charge_price: Set(self.charge_price),
            pickup_price: Set(self.pickup_price),
            is_active: Set(self.is_active),
        }
    }

    fn primary_key(id: &i32) -> i32 {
        *id
    }
}
