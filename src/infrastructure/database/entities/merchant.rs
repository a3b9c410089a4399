//! Merchant entity for database

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "merchants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub store_name: String,
    pub branch_id: i32,
    pub city_id: i32,
    /// Overrides the city's pickup price when set
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub special_pickup_price: Option<Decimal>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branch::Entity",
        from = "Column::BranchId",
        to = "super::branch::Column::Id"
    )]
    Branch,
    #[sea_orm(has_many = "super::merchant_city_price::Entity")]
    SpecialPrices,
}

impl Related<super::branch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branch.def()
    }
}

impl Related<super::merchant_city_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpecialPrices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
