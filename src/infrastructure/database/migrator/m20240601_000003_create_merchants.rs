//! Create merchants and merchant_city_prices tables

use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_branches::Branches;
use super::m20240601_000002_create_cities::Cities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Merchants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Merchants::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Merchants::Name).string().not_null())
                    .col(ColumnDef::new(Merchants::StoreName).string().not_null())
                    .col(ColumnDef::new(Merchants::BranchId).integer().not_null())
                    .col(ColumnDef::new(Merchants::CityId).integer().not_null())
                    .col(ColumnDef::new(Merchants::SpecialPickupPrice).decimal_len(12, 2))
                    .col(
                        ColumnDef::new(Merchants::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_merchants_branch")
                            .from(Merchants::Table, Merchants::BranchId)
                            .to(Branches::Table, Branches::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_merchants_city")
                            .from(Merchants::Table, Merchants::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MerchantCityPrices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MerchantCityPrices::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MerchantCityPrices::MerchantId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MerchantCityPrices::CityId).integer().not_null())
                    .col(
                        ColumnDef::new(MerchantCityPrices::SpecialPrice)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_merchant_city_prices_merchant")
                            .from(MerchantCityPrices::Table, MerchantCityPrices::MerchantId)
                            .to(Merchants::Table, Merchants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_merchant_city_prices_city")
                            .from(MerchantCityPrices::Table, MerchantCityPrices::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One special price per merchant and city
        manager
            .create_index(
                Index::create()
                    .name("idx_merchant_city_prices_pair")
                    .table(MerchantCityPrices::Table)
                    .col(MerchantCityPrices::MerchantId)
                    .col(MerchantCityPrices::CityId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MerchantCityPrices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Merchants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Merchants {
    Table,
    Id,
    Name,
    StoreName,
    BranchId,
    CityId,
    SpecialPickupPrice,
    IsActive,
}

#[derive(DeriveIden)]
pub enum MerchantCityPrices {
    Table,
    Id,
    MerchantId,
    CityId,
    SpecialPrice,
}
