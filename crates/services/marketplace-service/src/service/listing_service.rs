//! Listing lifecycle - creation, owner edits, moderation and deletion.
//!
//! Every listing enters as `pending`, whoever submits it. Only admins move
//! it to `approved` or `rejected`; the seller hears about both outcomes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    messages, policy, Actor, NewProduct, Notification, Product, ProductPatch, ProductStatus,
};

use crate::repository::{ProductRepository, UserRepository};
use crate::service::notification_service::{notify, notify_admins, NotificationSender};

/// Filters for the public catalogue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive match on title, description or location
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ProductQuery {
    fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map_or(true, |c| product.category.eq_ignore_ascii_case(c));
        let search_ok = self
            .search
            .as_deref()
            .map_or(true, |q| product.matches_query(q));
        category_ok && search_ok
    }
}

#[async_trait]
pub trait ListingService: Send + Sync {
    /// Submit a listing; it always starts out pending moderation
    async fn create_product(&self, actor: &Actor, input: NewProduct) -> AppResult<Product>;

    /// Owner edit; status is never changed by an edit
    async fn update_product(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: ProductPatch,
    ) -> AppResult<Product>;

    async fn approve_product(&self, actor: &Actor, id: Uuid) -> AppResult<Product>;

    /// A blank reason falls back to the default rejection message
    async fn reject_product(&self, actor: &Actor, id: Uuid, reason: &str) -> AppResult<Product>;

    /// Owner or admin; also removes the listing from every favorites list
    async fn delete_product(&self, actor: &Actor, id: Uuid) -> AppResult<()>;

    async fn get_product(&self, viewer: Option<&Actor>, id: Uuid) -> AppResult<Product>;

    /// Approved listings, or every listing for an admin viewer
    async fn list_products(
        &self,
        viewer: Option<&Actor>,
        query: ProductQuery,
    ) -> AppResult<Vec<Product>>;

    async fn list_my_products(&self, actor: &Actor) -> AppResult<Vec<Product>>;

    /// Moderation queue (admin only)
    async fn list_pending(&self, actor: &Actor) -> AppResult<Vec<Product>>;

    /// Whether the actor may submit another listing right now
    async fn can_add_product(&self, actor: &Actor) -> AppResult<bool>;
}

pub struct ListingManager {
    products: Arc<dyn ProductRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn NotificationSender>,
}

impl ListingManager {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            products,
            users,
            notifier,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_not_found(messages::PRODUCT_NOT_FOUND)
    }

    /// First listing turns a buyer into a seller.
    async fn promote_seller(&self, seller_id: Uuid) -> AppResult<()> {
        let Some(mut user) = self.users.find_by_id(seller_id).await? else {
            return Ok(());
        };
        if user.promote_to_seller() {
            self.users.update(user).await?;
            info!(user_id = %seller_id, "Account promoted to seller");
        }
        Ok(())
    }
}

#[async_trait]
impl ListingService for ListingManager {
    async fn create_product(&self, actor: &Actor, input: NewProduct) -> AppResult<Product> {
        input.validate()?;
        policy::check_new_listing(actor, &input)?;

        let active = self.products.count_active_by_seller(actor.id).await?;
        policy::check_listing_quota(actor, active)?;

        let product = Product::submit(Uuid::new_v4(), actor.id, input);
        let product = self.products.create(product).await?;
        info!(product_id = %product.id, seller_id = %actor.id, "Listing submitted for moderation");

        self.promote_seller(actor.id).await?;
        notify_admins(self.notifier.as_ref(), Notification::product_submitted(&product)).await;

        Ok(product)
    }

    async fn update_product(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: ProductPatch,
    ) -> AppResult<Product> {
        patch.validate()?;
        let mut product = self.load(id).await?;
        policy::check_listing_edit(actor, &product, &patch)?;

        product.apply_patch(patch);
        let product = self.products.update(product).await?;
        info!(product_id = %product.id, seller_id = %actor.id, "Listing updated");
        Ok(product)
    }

    async fn approve_product(&self, actor: &Actor, id: Uuid) -> AppResult<Product> {
        policy::require_admin(actor)?;
        let mut product = self.load(id).await?;

        product.approve(actor.id);
        let product = self.products.update(product).await?;
        info!(product_id = %product.id, admin_id = %actor.id, "Listing approved");

        notify(
            self.notifier.as_ref(),
            product.seller_id,
            Notification::product_approved(&product),
        )
        .await;
        Ok(product)
    }

    async fn reject_product(&self, actor: &Actor, id: Uuid, reason: &str) -> AppResult<Product> {
        policy::require_admin(actor)?;
        let mut product = self.load(id).await?;

        let reason = product.reject(reason)?;
        let product = self.products.update(product).await?;
        info!(product_id = %product.id, admin_id = %actor.id, "Listing rejected");

        notify(
            self.notifier.as_ref(),
            product.seller_id,
            Notification::product_rejected(&product, &reason),
        )
        .await;
        Ok(product)
    }

    async fn delete_product(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let product = self.load(id).await?;
        if !policy::can_delete_product(actor, &product) {
            return Err(AppError::forbidden(messages::CANNOT_DELETE_PRODUCT));
        }

        self.products.delete(product.id).await?;
        info!(product_id = %id, actor_id = %actor.id, "Listing deleted");
        Ok(())
    }

    async fn get_product(&self, viewer: Option<&Actor>, id: Uuid) -> AppResult<Product> {
        let product = self.load(id).await?;
        if policy::can_view_product(viewer, &product) {
            Ok(product)
        } else {
            // Hidden listings are indistinguishable from missing ones
            Err(AppError::not_found(messages::PRODUCT_NOT_FOUND))
        }
    }

    async fn list_products(
        &self,
        viewer: Option<&Actor>,
        query: ProductQuery,
    ) -> AppResult<Vec<Product>> {
        let status = match viewer {
            Some(actor) if policy::is_admin(actor) => None,
            _ => Some(ProductStatus::Approved),
        };

        let products = self.products.list(status).await?;
        Ok(products
            .into_iter()
            .filter(|p| policy::can_view_product(viewer, p) && query.matches(p))
            .collect())
    }

    async fn list_my_products(&self, actor: &Actor) -> AppResult<Vec<Product>> {
        self.products.list_by_seller(actor.id).await
    }

    async fn list_pending(&self, actor: &Actor) -> AppResult<Vec<Product>> {
        policy::require_admin(actor)?;
        self.products.list(Some(ProductStatus::Pending)).await
    }

    async fn can_add_product(&self, actor: &Actor) -> AppResult<bool> {
        if actor.is_premium() {
            return Ok(true);
        }
        let active = self.products.count_active_by_seller(actor.id).await?;
        Ok(policy::can_add_product(actor, active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Condition, Role, Tier, User};
    use mockall::predicate::eq;

    use crate::repository::{MockProductRepository, MockUserRepository};
    use crate::service::notification_service::MockNotificationSender;

    fn actor(role: Role, tier: Tier) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            name: "Aminata".to_string(),
            phone: "776543210".to_string(),
            role,
            tier,
        }
    }

    fn new_product() -> NewProduct {
        NewProduct {
            title: "Chaussures Nike".to_string(),
            description: "Taille 42, portées deux fois".to_string(),
            price: 10_000,
            images: vec!["https://img.example/1.jpg".to_string()],
            category: "mode".to_string(),
            location: "Dakar".to_string(),
            condition: Some(Condition::Used),
            ..Default::default()
        }
    }

    fn quiet_notifier() -> MockNotificationSender {
        let mut notifier = MockNotificationSender::new();
        notifier.expect_send().returning(|_, _| Ok(()));
        notifier.expect_send_to_admins().returning(|_| Ok(()));
        notifier
    }

    fn manager(
        products: MockProductRepository,
        users: MockUserRepository,
        notifier: MockNotificationSender,
    ) -> ListingManager {
        ListingManager::new(Arc::new(products), Arc::new(users), Arc::new(notifier))
    }

    #[tokio::test]
    async fn test_create_product_is_pending_even_for_admin() {
        let admin = actor(Role::Admin, Tier::Premium);

        let mut products = MockProductRepository::new();
        products
            .expect_count_active_by_seller()
            .returning(|_| Ok(0));
        products.expect_create().returning(|p| Ok(p));

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let mut notifier = MockNotificationSender::new();
        notifier
            .expect_send_to_admins()
            .times(1)
            .returning(|_| Ok(()));

        let service = manager(products, users, notifier);
        let product = service.create_product(&admin, new_product()).await.unwrap();

        assert_eq!(product.status, ProductStatus::Pending);
        assert_eq!(product.seller_id, admin.id);
    }

    #[tokio::test]
    async fn test_create_product_quota_reached_does_not_persist() {
        let seller = actor(Role::Seller, Tier::Standard);

        let mut products = MockProductRepository::new();
        products
            .expect_count_active_by_seller()
            .with(eq(seller.id))
            .returning(|_| Ok(5));
        products.expect_create().never();

        let service = manager(products, MockUserRepository::new(), quiet_notifier());
        let err = service
            .create_product(&seller, new_product())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::QuotaExceeded(_)));
        assert!(err.to_string().contains('5'));
    }

    #[tokio::test]
    async fn test_create_product_missing_field_rejected_before_store() {
        let seller = actor(Role::Seller, Tier::Standard);
        let mut input = new_product();
        input.title = "  ".to_string();

        let mut products = MockProductRepository::new();
        products.expect_count_active_by_seller().never();
        products.expect_create().never();

        let service = manager(products, MockUserRepository::new(), quiet_notifier());
        let err = service.create_product(&seller, input).await.unwrap_err();

        assert_eq!(err.to_string(), messages::TITLE_REQUIRED);
    }

    #[tokio::test]
    async fn test_first_listing_promotes_buyer_to_seller() {
        let buyer = actor(Role::Buyer, Tier::Standard);
        let stored = User::new(
            buyer.id,
            buyer.phone.clone(),
            buyer.name.clone(),
            "hash".to_string(),
            None,
        );

        let mut products = MockProductRepository::new();
        products
            .expect_count_active_by_seller()
            .returning(|_| Ok(0));
        products.expect_create().returning(|p| Ok(p));

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        users
            .expect_update()
            .withf(|u| u.role == Role::Seller)
            .times(1)
            .returning(|u| Ok(u));

        let service = manager(products, users, quiet_notifier());
        assert!(service.create_product(&buyer, new_product()).await.is_ok());
    }

    #[tokio::test]
    async fn test_reject_notifies_seller_with_reason() {
        let admin = actor(Role::Admin, Tier::Standard);
        let seller_id = Uuid::new_v4();
        let listing = Product::submit(Uuid::new_v4(), seller_id, new_product());
        let listing_id = listing.id;

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .with(eq(listing_id))
            .returning(move |_| Ok(Some(listing.clone())));
        products.expect_update().returning(|p| Ok(p));

        let mut notifier = MockNotificationSender::new();
        notifier
            .expect_send()
            .withf(move |user_id, n| *user_id == seller_id && n.message.contains("photos floues"))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = manager(products, MockUserRepository::new(), notifier);
        let product = service
            .reject_product(&admin, listing_id, "photos floues")
            .await
            .unwrap();

        assert_eq!(product.status, ProductStatus::Rejected);
        assert_eq!(product.rejection_reason.as_deref(), Some("photos floues"));
    }

    #[tokio::test]
    async fn test_moderation_requires_admin() {
        let seller = actor(Role::Seller, Tier::Premium);

        let mut products = MockProductRepository::new();
        products.expect_find_by_id().never();
        products.expect_update().never();

        let service = manager(products, MockUserRepository::new(), quiet_notifier());
        let err = service
            .approve_product(&seller, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_approval() {
        let admin = actor(Role::SuperAdmin, Tier::Standard);
        let listing = Product::submit(Uuid::new_v4(), Uuid::new_v4(), new_product());
        let listing_id = listing.id;

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(listing.clone())));
        products.expect_update().returning(|p| Ok(p));

        let mut notifier = MockNotificationSender::new();
        notifier
            .expect_send()
            .returning(|_, _| Err(AppError::internal("push gateway down")));

        let service = manager(products, MockUserRepository::new(), notifier);
        let product = service.approve_product(&admin, listing_id).await.unwrap();
        assert_eq!(product.status, ProductStatus::Approved);
        assert_eq!(product.approved_by, Some(admin.id));
    }

    #[tokio::test]
    async fn test_hidden_listing_looks_missing_to_strangers() {
        let listing = Product::submit(Uuid::new_v4(), Uuid::new_v4(), new_product());
        let listing_id = listing.id;

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(listing.clone())));

        let service = manager(products, MockUserRepository::new(), quiet_notifier());
        let stranger = actor(Role::Buyer, Tier::Standard);

        let err = service
            .get_product(Some(&stranger), listing_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(service.get_product(None, listing_id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_products_filters_by_category_and_search() {
        let mut shoes = Product::submit(Uuid::new_v4(), Uuid::new_v4(), new_product());
        shoes.approve(Uuid::new_v4());
        let mut phone = Product::submit(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NewProduct {
                title: "iPhone 12".to_string(),
                category: "electronique".to_string(),
                location: "Thiès".to_string(),
                ..new_product()
            },
        );
        phone.approve(Uuid::new_v4());
        let catalogue = vec![shoes, phone];

        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .with(eq(Some(ProductStatus::Approved)))
            .returning(move |_| Ok(catalogue.clone()));

        let service = manager(products, MockUserRepository::new(), quiet_notifier());

        let by_category = service
            .list_products(
                None,
                ProductQuery {
                    category: Some("Electronique".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].title, "iPhone 12");

        let by_search = service
            .list_products(
                None,
                ProductQuery {
                    search: Some("nike".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_search.len(), 1);
        assert_eq!(by_search[0].title, "Chaussures Nike");
    }

    #[tokio::test]
    async fn test_delete_by_stranger_is_forbidden() {
        let listing = Product::submit(Uuid::new_v4(), Uuid::new_v4(), new_product());
        let listing_id = listing.id;

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(listing.clone())));
        products.expect_delete().never();

        let service = manager(products, MockUserRepository::new(), quiet_notifier());
        let stranger = actor(Role::Seller, Tier::Premium);
        let err = service
            .delete_product(&stranger, listing_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
