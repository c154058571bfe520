//! Review repository implementation.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::entities::order::{self, Entity as OrderEntity};
use super::entities::review::{self, ActiveModel, Entity as ReviewEntity};
use common::{AppError, AppResult};
use domain::{messages, Review};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Whether `user_id` already reviewed `order_id`
    async fn exists_for(&self, order_id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Insert the review and flag its order as reviewed, atomically
    async fn create(&self, review: Review) -> AppResult<Review>;

    async fn list_by_product(&self, product_id: Uuid) -> AppResult<Vec<Review>>;

    async fn list_by_seller(&self, seller_id: Uuid) -> AppResult<Vec<Review>>;
}

pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn exists_for(&self, order_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let count = ReviewEntity::find()
            .filter(review::Column::OrderId.eq(order_id))
            .filter(review::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, review: Review) -> AppResult<Review> {
        let txn = self.db.begin().await?;

        let model = match ActiveModel::from(&review).insert(&txn).await {
            Ok(model) => model,
            // The unique (order_id, user_id) index backs the single-review rule
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                return Err(AppError::conflict(messages::REVIEW_ALREADY_SUBMITTED));
            }
            Err(e) => return Err(AppError::from(e)),
        };

        OrderEntity::update_many()
            .col_expr(order::Column::HasReview, Expr::value(true))
            .filter(order::Column::Id.eq(review.order_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(Review::from(model))
    }

    async fn list_by_product(&self, product_id: Uuid) -> AppResult<Vec<Review>> {
        let models = ReviewEntity::find()
            .filter(review::Column::ProductId.eq(product_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Review::from).collect())
    }

    async fn list_by_seller(&self, seller_id: Uuid) -> AppResult<Vec<Review>> {
        let models = ReviewEntity::find()
            .filter(review::Column::SellerId.eq(seller_id))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Review::from).collect())
    }
}
