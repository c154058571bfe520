//! Order repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::order::{self, ActiveModel, Entity as OrderEntity};
use common::{AppError, AppResult};
use domain::{messages, Order, OrderStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;

    async fn create(&self, order: Order) -> AppResult<Order>;

    /// Persist status, timestamps and every other field
    async fn update(&self, order: Order) -> AppResult<Order>;

    /// Orders placed by the buyer, newest first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Order>>;

    /// All orders, or only those in `status`, newest first
    async fn list(&self, status: Option<OrderStatus>) -> AppResult<Vec<Order>>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_orders(models: Vec<order::Model>) -> AppResult<Vec<Order>> {
    models
        .into_iter()
        .map(|model| Order::try_from(model).map_err(AppError::from))
        .collect()
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        let result = OrderEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Order::try_from).transpose()?)
    }

    async fn create(&self, order: Order) -> AppResult<Order> {
        let active_model = ActiveModel::try_from(&order)?;
        let model = active_model.insert(&self.db).await?;
        Ok(Order::try_from(model)?)
    }

    async fn update(&self, order: Order) -> AppResult<Order> {
        let active_model = ActiveModel::try_from(&order)?;

        match active_model.update(&self.db).await {
            Ok(model) => Ok(Order::try_from(model)?),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found(messages::ORDER_NOT_FOUND)),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        let models = OrderEntity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;
        into_orders(models)
    }

    async fn list(&self, status: Option<OrderStatus>) -> AppResult<Vec<Order>> {
        let mut query = OrderEntity::find();
        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;
        into_orders(models)
    }
}
