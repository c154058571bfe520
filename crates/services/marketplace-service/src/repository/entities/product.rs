//! Product (listing) database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{Condition, ListingType, Product, ProductStatus, ServiceDetails};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: i64,
    /// JSON array of image URLs
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    pub category: String,
    pub sub_category: Option<String>,
    pub location: String,
    pub condition: Option<String>,
    pub listing_type: String,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub service_details: Option<Json>,
    pub stock_quantity: Option<i32>,
    pub is_out_of_stock: bool,
    pub has_discount: bool,
    pub discount_percent: Option<i32>,
    pub original_price: Option<i64>,
    pub status: String,
    pub approved_at: Option<DateTimeUtc>,
    pub approved_by: Option<Uuid>,
    pub rejected_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Product {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let images: Vec<String> =
            serde_json::from_value(model.images).map_err(|e| DbErr::Json(e.to_string()))?;
        let service_details = model
            .service_details
            .map(serde_json::from_value::<ServiceDetails>)
            .transpose()
            .map_err(|e| DbErr::Json(e.to_string()))?;

        Ok(Product {
            id: model.id,
            seller_id: model.seller_id,
            title: model.title,
            description: model.description,
            price: model.price,
            images,
            category: model.category,
            sub_category: model.sub_category,
            location: model.location,
            condition: model.condition.as_deref().and_then(Condition::parse),
            listing_type: ListingType::from(model.listing_type.as_str()),
            service_details,
            stock_quantity: model.stock_quantity,
            is_out_of_stock: model.is_out_of_stock,
            has_discount: model.has_discount,
            discount_percent: model.discount_percent,
            original_price: model.original_price,
            status: ProductStatus::from(model.status.as_str()),
            approved_at: model.approved_at,
            approved_by: model.approved_by,
            rejected_at: model.rejected_at,
            rejection_reason: model.rejection_reason,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<&Product> for ActiveModel {
    type Error = DbErr;

    fn try_from(product: &Product) -> Result<Self, Self::Error> {
        let images =
            serde_json::to_value(&product.images).map_err(|e| DbErr::Json(e.to_string()))?;
        let service_details = product
            .service_details
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DbErr::Json(e.to_string()))?;

        Ok(ActiveModel {
            id: Set(product.id),
            seller_id: Set(product.seller_id),
            title: Set(product.title.clone()),
            description: Set(product.description.clone()),
            price: Set(product.price),
            images: Set(images),
            category: Set(product.category.clone()),
            sub_category: Set(product.sub_category.clone()),
            location: Set(product.location.clone()),
            condition: Set(product.condition.map(|c| c.as_str().to_string())),
            listing_type: Set(product.listing_type.as_str().to_string()),
            service_details: Set(service_details),
            stock_quantity: Set(product.stock_quantity),
            is_out_of_stock: Set(product.is_out_of_stock),
            has_discount: Set(product.has_discount),
            discount_percent: Set(product.discount_percent),
            original_price: Set(product.original_price),
            status: Set(product.status.as_str().to_string()),
            approved_at: Set(product.approved_at),
            approved_by: Set(product.approved_by),
            rejected_at: Set(product.rejected_at),
            rejection_reason: Set(product.rejection_reason.clone()),
            created_at: Set(product.created_at),
            updated_at: Set(product.updated_at),
        })
    }
}
