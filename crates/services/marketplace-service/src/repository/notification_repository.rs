//! Notification repository implementation.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::notification::{self, ActiveModel, Entity as NotificationEntity};
use common::{AppError, AppResult};
use domain::StoredNotification;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create_many(&self, notifications: Vec<StoredNotification>) -> AppResult<()>;

    /// A user's notifications, newest first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<StoredNotification>>;

    /// Returns false when no notification `id` belongs to `user_id`
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;
}

pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for NotificationStore {
    async fn create_many(&self, notifications: Vec<StoredNotification>) -> AppResult<()> {
        if notifications.is_empty() {
            return Ok(());
        }
        NotificationEntity::insert_many(notifications.iter().map(ActiveModel::from))
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<StoredNotification>> {
        let models = NotificationEntity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models
            .into_iter()
            .map(|model| StoredNotification::try_from(model).map_err(AppError::from))
            .collect()
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = NotificationEntity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
