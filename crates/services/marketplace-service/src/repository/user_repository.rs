//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::entities::favorite::{self, Entity as FavoriteEntity};
use super::entities::notification::{self, Entity as NotificationEntity};
use super::entities::product::{self, Entity as ProductEntity};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{messages, User, ROLE_ADMIN, ROLE_SUPER_ADMIN};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>>;

    /// The singleton super-admin, if one has been promoted
    async fn find_super_admin(&self) -> AppResult<Option<User>>;

    /// Insert a new account. A duplicate phone is a conflict.
    async fn create(&self, user: User) -> AppResult<User>;

    /// Persist every field of an existing account
    async fn update(&self, user: User) -> AppResult<User>;

    /// Delete the account together with its listings, their favorites and
    /// the user's own favorites and notifications
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn list(&self) -> AppResult<Vec<User>>;

    /// Admins and the super-admin (notification recipients)
    async fn list_admins(&self) -> AppResult<Vec<User>>;

    /// Accounts with a premium payment awaiting reconciliation
    async fn list_premium_requests(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_super_admin(&self) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Role.eq(ROLE_SUPER_ADMIN))
            .order_by_asc(user::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let active_model = ActiveModel::from(&user);

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::conflict(messages::PHONE_TAKEN))
            }
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let active_model = ActiveModel::from(&user);

        match active_model.update(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found(messages::USER_NOT_FOUND)),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let product_ids: Vec<Uuid> = ProductEntity::find()
            .select_only()
            .column(product::Column::Id)
            .filter(product::Column::SellerId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        FavoriteEntity::delete_many()
            .filter(
                Condition::any()
                    .add(favorite::Column::UserId.eq(id))
                    .add(favorite::Column::ProductId.is_in(product_ids)),
            )
            .exec(&txn)
            .await?;

        ProductEntity::delete_many()
            .filter(product::Column::SellerId.eq(id))
            .exec(&txn)
            .await?;

        NotificationEntity::delete_many()
            .filter(notification::Column::UserId.eq(id))
            .exec(&txn)
            .await?;

        let result = UserEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            return Err(AppError::not_found(messages::USER_NOT_FOUND));
        }

        txn.commit().await?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn list_admins(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::Role.is_in([ROLE_ADMIN, ROLE_SUPER_ADMIN]))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn list_premium_requests(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::PremiumPaymentPending.eq(true))
            .order_by_asc(user::Column::PremiumRequestDate)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
