//! Global pricing standard (single row)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "standards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Weight in kg covered by the base charge
    #[sea_orm(column_type = "Decimal(Some((10, 3)))")]
    pub standard_weight: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub kg_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub village_price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
