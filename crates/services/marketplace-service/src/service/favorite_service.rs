//! Buyer favorites.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{messages, policy, Actor, Product};

use crate::repository::{FavoriteRepository, ProductRepository};

#[async_trait]
pub trait FavoriteService: Send + Sync {
    /// Only listings the actor can see may be saved
    async fn add_favorite(&self, actor: &Actor, product_id: Uuid) -> AppResult<()>;

    /// Removing an absent favorite is a no-op
    async fn remove_favorite(&self, actor: &Actor, product_id: Uuid) -> AppResult<()>;

    /// Saved listings still visible to the actor
    async fn list_favorites(&self, actor: &Actor) -> AppResult<Vec<Product>>;
}

pub struct FavoriteManager {
    favorites: Arc<dyn FavoriteRepository>,
    products: Arc<dyn ProductRepository>,
}

impl FavoriteManager {
    pub fn new(favorites: Arc<dyn FavoriteRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self {
            favorites,
            products,
        }
    }
}

#[async_trait]
impl FavoriteService for FavoriteManager {
    async fn add_favorite(&self, actor: &Actor, product_id: Uuid) -> AppResult<()> {
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_not_found(messages::PRODUCT_NOT_FOUND)?;
        if !policy::can_view_product(Some(actor), &product) {
            return Err(AppError::not_found(messages::PRODUCT_NOT_FOUND));
        }

        self.favorites.add(actor.id, product_id).await
    }

    async fn remove_favorite(&self, actor: &Actor, product_id: Uuid) -> AppResult<()> {
        let removed = self.favorites.remove(actor.id, product_id).await?;
        debug!(user_id = %actor.id, %product_id, removed, "Favorite removed");
        Ok(())
    }

    async fn list_favorites(&self, actor: &Actor) -> AppResult<Vec<Product>> {
        let ids = self.favorites.list_product_ids(actor.id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let products = self.products.find_many(ids).await?;
        Ok(products
            .into_iter()
            .filter(|p| policy::can_view_product(Some(actor), p))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Condition, NewProduct, Role, Tier};
    use mockall::predicate::eq;

    use crate::repository::{MockFavoriteRepository, MockProductRepository};

    fn buyer() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            name: "Ndeye".to_string(),
            phone: "769998877".to_string(),
            role: Role::Buyer,
            tier: Tier::Standard,
        }
    }

    fn listing(approved: bool) -> Product {
        let mut product = Product::submit(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NewProduct {
                title: "Téléphone".to_string(),
                description: "Bon état".to_string(),
                price: 60_000,
                images: vec!["https://img.example/tel.jpg".to_string()],
                category: "electronique".to_string(),
                location: "Dakar".to_string(),
                condition: Some(Condition::Refurbished),
                ..Default::default()
            },
        );
        if approved {
            product.approve(Uuid::new_v4());
        }
        product
    }

    #[tokio::test]
    async fn test_cannot_favorite_pending_listing() {
        let pending = listing(false);
        let pending_id = pending.id;

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .with(eq(pending_id))
            .returning(move |_| Ok(Some(pending.clone())));

        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_add().never();

        let service = FavoriteManager::new(Arc::new(favorites), Arc::new(products));
        let err = service.add_favorite(&buyer(), pending_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_hides_listings_no_longer_visible() {
        let visible = listing(true);
        let hidden = listing(false);
        let ids = vec![visible.id, hidden.id];
        let visible_id = visible.id;

        let mut favorites = MockFavoriteRepository::new();
        favorites
            .expect_list_product_ids()
            .returning(move |_| Ok(ids.clone()));

        let mut products = MockProductRepository::new();
        products
            .expect_find_many()
            .returning(move |_| Ok(vec![visible.clone(), hidden.clone()]));

        let service = FavoriteManager::new(Arc::new(favorites), Arc::new(products));
        let listed = service.list_favorites(&buyer()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, visible_id);
    }

    #[tokio::test]
    async fn test_empty_favorites_skip_product_lookup() {
        let mut favorites = MockFavoriteRepository::new();
        favorites
            .expect_list_product_ids()
            .returning(|_| Ok(Vec::new()));

        let mut products = MockProductRepository::new();
        products.expect_find_many().never();

        let service = FavoriteManager::new(Arc::new(favorites), Arc::new(products));
        assert!(service.list_favorites(&buyer()).await.unwrap().is_empty());
    }
}
