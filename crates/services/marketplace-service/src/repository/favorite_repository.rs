//! Favorites repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::favorite::{self, ActiveModel, Entity as FavoriteEntity};
use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Idempotent: adding an existing favorite is a no-op
    async fn add(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()>;

    /// Returns false when there was nothing to remove
    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool>;

    /// Favorited product ids, most recent first
    async fn list_product_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>>;
}

pub struct FavoriteStore {
    db: DatabaseConnection,
}

impl FavoriteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteRepository for FavoriteStore {
    async fn add(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let active_model = ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            created_at: Set(Utc::now()),
        };

        FavoriteEntity::insert(active_model)
            .on_conflict(
                OnConflict::columns([favorite::Column::UserId, favorite::Column::ProductId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        let result = FavoriteEntity::delete_many()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_product_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let ids = FavoriteEntity::find()
            .select_only()
            .column(favorite::Column::ProductId)
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_desc(favorite::Column::CreatedAt)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids)
    }
}
