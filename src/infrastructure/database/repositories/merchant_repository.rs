//! SeaORM mappings for merchants and their special city prices

use sea_orm::Set;

use crate::domain::{Merchant, MerchantCityPrice};
use crate::infrastructure::database::entities::{merchant, merchant_city_price};
use crate::infrastructure::database::store::SeaOrmMapped;

impl SeaOrmMapped for Merchant {
    type Db = merchant::Entity;
    type Active = merchant::ActiveModel;

    fn from_model(m: merchant::Model) -> Self {
        Merchant {
            id: m.id,
            name: m.name,
            store_name: m.store_name,
            branch_id: m.branch_id,
            city_id: m.city_id,
            special_pickup_price: m.special_pickup_price,
            is_active: m.is_active,
        }
    }

    fn to_active_model(&self) -> merchant::ActiveModel {
        merchant::ActiveModel {
            id: Set(self.id),
            name: Set(self.name.clone()),
            store_name: Set(self.store_name.clone()),
            branch_id: Set(self.branch_id),
            city_id: Set(self.city_id),
            special_pickup_price: Set(self.special_pickup_price),
            is_active: Set(self.is_active),
        }
    }

    fn primary_key(id: &i32) -> i32 {
        *id
    }
}

impl SeaOrmMapped for MerchantCityPrice {
    type Db = merchant_city_price::Entity;
    type Active = merchant_city_price::ActiveModel;

    fn from_model(m: merchant_city_price::Model) -> Self {
        MerchantCityPrice {
            id: m.id,
            merchant_id: m.merchant_id,
            city_id: m.city_id,
            special_price: m.special_price,
        }
    }

    fn to_active_model(&self) -> merchant_city_price::ActiveModel {
        merchant_city_price::ActiveModel {
            id: Set(self.id),
            merchant_id: Set(self.merchant_id),
            city_id: Set(self.city_id),
            special_price: Set(self.special_price),
        }
    }

    fn primary_key(id: &i32) -> i32 {
        *id
    }
}
