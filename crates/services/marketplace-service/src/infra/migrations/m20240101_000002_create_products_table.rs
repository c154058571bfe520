//! Migration: Create products table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::SellerId).uuid().not_null())
                    .col(ColumnDef::new(Products::Title).string().not_null())
                    .col(ColumnDef::new(Products::Description).text().not_null())
                    .col(ColumnDef::new(Products::Price).big_integer().not_null())
                    .col(ColumnDef::new(Products::Images).json_binary().not_null())
                    .col(ColumnDef::new(Products::Category).string().not_null())
                    .col(ColumnDef::new(Products::SubCategory).string().null())
                    .col(ColumnDef::new(Products::Location).string().not_null())
                    .col(ColumnDef::new(Products::Condition).string().null())
                    .col(
                        ColumnDef::new(Products::ListingType)
                            .string()
                            .not_null()
                            .default("product"),
                    )
                    .col(ColumnDef::new(Products::ServiceDetails).json_binary().null())
                    .col(ColumnDef::new(Products::StockQuantity).integer().null())
                    .col(
                        ColumnDef::new(Products::IsOutOfStock)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Products::HasDiscount)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Products::DiscountPercent).integer().null())
                    .col(ColumnDef::new(Products::OriginalPrice).big_integer().null())
                    .col(
                        ColumnDef::new(Products::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Products::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Products::ApprovedBy).uuid().null())
                    .col(
                        ColumnDef::new(Products::RejectedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Products::RejectionReason).text().null())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_seller_id")
                            .from(Products::Table, Products::SellerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Quota counting and "my listings" filter by seller
        manager
            .create_index(
                Index::create()
                    .name("idx_products_seller_id")
                    .table(Products::Table)
                    .col(Products::SellerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_status")
                    .table(Products::Table)
                    .col(Products::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Products {
    Table,
    Id,
    SellerId,
    Title,
    Description,
    Price,
    Images,
    Category,
    SubCategory,
    Location,
    Condition,
    ListingType,
    ServiceDetails,
    StockQuantity,
    IsOutOfStock,
    HasDiscount,
    DiscountPercent,
    OriginalPrice,
    Status,
    ApprovedAt,
    ApprovedBy,
    RejectedAt,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}
