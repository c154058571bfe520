//! Product (listing) repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use super::entities::favorite::{self, Entity as FavoriteEntity};
use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use common::{AppError, AppResult};
use domain::{messages, Product, ProductStatus, STATUS_APPROVED, STATUS_PENDING};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Listings with the given ids, in no particular order
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>>;

    /// All listings, or only those with `status`, newest first
    async fn list(&self, status: Option<ProductStatus>) -> AppResult<Vec<Product>>;

    async fn list_by_seller(&self, seller_id: Uuid) -> AppResult<Vec<Product>>;

    /// Pending plus approved listings owned by the seller
    async fn count_active_by_seller(&self, seller_id: Uuid) -> AppResult<u64>;

    async fn create(&self, product: Product) -> AppResult<Product>;

    async fn update(&self, product: Product) -> AppResult<Product>;

    /// Delete the listing and every favorite pointing at it
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_products(models: Vec<product::Model>) -> AppResult<Vec<Product>> {
    models
        .into_iter()
        .map(|model| Product::try_from(model).map_err(AppError::from))
        .collect()
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Product::try_from).transpose()?)
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = ProductEntity::find()
            .filter(product::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        into_products(models)
    }

    async fn list(&self, status: Option<ProductStatus>) -> AppResult<Vec<Product>> {
        let mut query = ProductEntity::find();
        if let Some(status) = status {
            query = query.filter(product::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(product::Column::CreatedAt)
            .all(&self.db)
            .await?;
        into_products(models)
    }

    async fn list_by_seller(&self, seller_id: Uuid) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .filter(product::Column::SellerId.eq(seller_id))
            .order_by_desc(product::Column::CreatedAt)
            .all(&self.db)
            .await?;
        into_products(models)
    }

    async fn count_active_by_seller(&self, seller_id: Uuid) -> AppResult<u64> {
        let count = ProductEntity::find()
            .filter(product::Column::SellerId.eq(seller_id))
            .filter(product::Column::Status.is_in([STATUS_PENDING, STATUS_APPROVED]))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn create(&self, product: Product) -> AppResult<Product> {
        let active_model = ActiveModel::try_from(&product)?;
        let model = active_model.insert(&self.db).await?;
        Ok(Product::try_from(model)?)
    }

    async fn update(&self, product: Product) -> AppResult<Product> {
        let active_model = ActiveModel::try_from(&product)?;

        match active_model.update(&self.db).await {
            Ok(model) => Ok(Product::try_from(model)?),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found(messages::PRODUCT_NOT_FOUND)),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        FavoriteEntity::delete_many()
            .filter(favorite::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;

        let result = ProductEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            return Err(AppError::not_found(messages::PRODUCT_NOT_FOUND));
        }

        txn.commit().await?;
        Ok(())
    }
}
