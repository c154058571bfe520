//! Migration: Create users table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Phone).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Avatar).string().null())
                    .col(ColumnDef::new(Users::Location).string().null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("buyer"),
                    )
                    .col(
                        ColumnDef::new(Users::Tier)
                            .string()
                            .not_null()
                            .default("standard"),
                    )
                    .col(
                        ColumnDef::new(Users::PremiumPaymentPending)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::PremiumRequestDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Users::DeliveryName).string().null())
                    .col(ColumnDef::new(Users::DeliveryPhone).string().null())
                    .col(ColumnDef::new(Users::DeliveryAddress).string().null())
                    .col(ColumnDef::new(Users::DeliveryCity).string().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Pending premium requests are listed for reconciliation
        manager
            .create_index(
                Index::create()
                    .name("idx_users_premium_payment_pending")
                    .table(Users::Table)
                    .col(Users::PremiumPaymentPending)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Phone,
    Name,
    Avatar,
    Location,
    PasswordHash,
    Role,
    Tier,
    PremiumPaymentPending,
    PremiumRequestDate,
    DeliveryName,
    DeliveryPhone,
    DeliveryAddress,
    DeliveryCity,
    CreatedAt,
    UpdatedAt,
}
