//! Order database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{DeliveryInfo, Order, OrderItem, OrderStatus, PaymentMethod};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_phone: String,
    /// Frozen line items: product snapshot, quantity, price at purchase
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
    pub total_amount: i64,
    pub payment_method: String,
    pub wave_transaction_id: Option<String>,
    pub delivery_name: String,
    pub delivery_phone: String,
    pub delivery_address: String,
    pub delivery_city: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub has_review: bool,
    pub created_at: DateTimeUtc,
    pub paid_at: Option<DateTimeUtc>,
    pub validated_at: Option<DateTimeUtc>,
    pub rejected_at: Option<DateTimeUtc>,
    pub shipped_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Order {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let items: Vec<OrderItem> =
            serde_json::from_value(model.items).map_err(|e| DbErr::Json(e.to_string()))?;

        Ok(Order {
            id: model.id,
            user_id: model.user_id,
            user_name: model.user_name,
            user_phone: model.user_phone,
            items,
            total_amount: model.total_amount,
            payment_method: PaymentMethod::Wave,
            wave_transaction_id: model.wave_transaction_id,
            delivery: DeliveryInfo {
                name: model.delivery_name,
                phone: model.delivery_phone,
                address: model.delivery_address,
                city: model.delivery_city,
            },
            status: OrderStatus::from(model.status.as_str()),
            rejection_reason: model.rejection_reason,
            has_review: model.has_review,
            created_at: model.created_at,
            paid_at: model.paid_at,
            validated_at: model.validated_at,
            rejected_at: model.rejected_at,
            shipped_at: model.shipped_at,
            completed_at: model.completed_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<&Order> for ActiveModel {
    type Error = DbErr;

    fn try_from(order: &Order) -> Result<Self, Self::Error> {
        let items = serde_json::to_value(&order.items).map_err(|e| DbErr::Json(e.to_string()))?;

        Ok(ActiveModel {
            id: Set(order.id),
            user_id: Set(order.user_id),
            user_name: Set(order.user_name.clone()),
            user_phone: Set(order.user_phone.clone()),
            items: Set(items),
            total_amount: Set(order.total_amount),
            payment_method: Set(order.payment_method.as_str().to_string()),
            wave_transaction_id: Set(order.wave_transaction_id.clone()),
            delivery_name: Set(order.delivery.name.clone()),
            delivery_phone: Set(order.delivery.phone.clone()),
            delivery_address: Set(order.delivery.address.clone()),
            delivery_city: Set(order.delivery.city.clone()),
            status: Set(order.status.as_str().to_string()),
            rejection_reason: Set(order.rejection_reason.clone()),
            has_review: Set(order.has_review),
            created_at: Set(order.created_at),
            paid_at: Set(order.paid_at),
            validated_at: Set(order.validated_at),
            rejected_at: Set(order.rejected_at),
            shipped_at: Set(order.shipped_at),
            completed_at: Set(order.completed_at),
            updated_at: Set(order.updated_at),
        })
    }
}
