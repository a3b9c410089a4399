//! SeaORM mapping for branches

use sea_orm::Set;

use crate::domain::Branch;
use crate::infrastructure::database::entities::branch;
use crate::infrastructure::database::store::SeaOrmMapped;

impl SeaOrmMapped for Branch {
    type Db = branch::Entity;
    type Active = branch::ActiveModel;

    fn from_model(m: branch::Model) -> Self {
        Branch {
            id: m.id,
            name: m.name,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }

    fn to_active_model(&self) -> branch::ActiveModel {
        branch::ActiveModel {
            id: Set(self.id),
            name: Set(self.name.clone()),
            is_active: Set(self.is_active),
            created_at: Set(self.created_at),
        }
    }

    fn primary_key(id: &i32) -> i32 {
        *id
    }
}
