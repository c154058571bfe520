//! Migration: Create orders table.
//!
//! Orders outlive their buyer and the listings they reference, so neither
//! side is a foreign key: items are stored as frozen JSON snapshots.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Orders::UserId).uuid().not_null())
                    .col(ColumnDef::new(Orders::UserName).string().not_null())
                    .col(ColumnDef::new(Orders::UserPhone).string().not_null())
                    .col(ColumnDef::new(Orders::Items).json_binary().not_null())
                    .col(ColumnDef::new(Orders::TotalAmount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::PaymentMethod)
                            .string()
                            .not_null()
                            .default("wave"),
                    )
                    .col(ColumnDef::new(Orders::WaveTransactionId).string().null())
                    .col(ColumnDef::new(Orders::DeliveryName).string().not_null())
                    .col(ColumnDef::new(Orders::DeliveryPhone).string().not_null())
                    .col(ColumnDef::new(Orders::DeliveryAddress).string().not_null())
                    .col(ColumnDef::new(Orders::DeliveryCity).string().not_null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string()
                            .not_null()
                            .default("pending_payment"),
                    )
                    .col(ColumnDef::new(Orders::RejectionReason).text().null())
                    .col(
                        ColumnDef::new(Orders::HasReview)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Orders::PaidAt).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Orders::ValidatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::RejectedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::ShippedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_user_id")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_status")
                    .table(Orders::Table)
                    .col(Orders::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    UserId,
    UserName,
    UserPhone,
    Items,
    TotalAmount,
    PaymentMethod,
    WaveTransactionId,
    DeliveryName,
    DeliveryPhone,
    DeliveryAddress,
    DeliveryCity,
    Status,
    RejectionReason,
    HasReview,
    CreatedAt,
    PaidAt,
    ValidatedAt,
    RejectedAt,
    ShippedAt,
    CompletedAt,
    UpdatedAt,
}
