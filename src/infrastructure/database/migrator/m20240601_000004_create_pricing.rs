//! Create charge_types and standards tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChargeTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChargeTypes::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChargeTypes::Name).string().not_null())
                    .col(
                        ColumnDef::new(ChargeTypes::ExtraPrice)
                            .decimal_len(12, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ChargeTypes::DeliveryDays)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(ChargeTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Standards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Standards::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Standards::StandardWeight)
                            .decimal_len(10, 3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Standards::KgPrice).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Standards::VillagePrice)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Standards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChargeTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ChargeTypes {
    Table,
    Id,
    Name,
    ExtraPrice,
    DeliveryDays,
    IsActive,
}

#[derive(DeriveIden)]
pub enum Standards {
    Table,
    Id,
    StandardWeight,
    KgPrice,
    VillagePrice,
}
