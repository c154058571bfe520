//! In-memory repositories shared by the lifecycle tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::{
    messages, Actor, Order, OrderStatus, Product, ProductStatus, Review, Role, StoredNotification,
    Tier, User,
};
use marketplace_service_lib::repository::{
    FavoriteRepository, NotificationRepository, OrderRepository, ProductRepository,
    ReviewRepository, UserRepository,
};
use marketplace_service_lib::service::{
    AccountManager, Authenticator, FavoriteManager, InAppNotifier, ListingManager,
    NotificationManager, NotificationSender, OrderManager, ReviewManager,
};

#[derive(Default)]
pub struct Tables {
    pub users: Mutex<HashMap<Uuid, User>>,
    pub products: Mutex<HashMap<Uuid, Product>>,
    pub orders: Mutex<HashMap<Uuid, Order>>,
    pub reviews: Mutex<Vec<Review>>,
    pub favorites: Mutex<HashSet<(Uuid, Uuid)>>,
    pub notifications: Mutex<Vec<StoredNotification>>,
}

impl Tables {
    pub fn product(&self, id: Uuid) -> Product {
        self.products.lock().unwrap()[&id].clone()
    }

    pub fn order(&self, id: Uuid) -> Order {
        self.orders.lock().unwrap()[&id].clone()
    }

    pub fn user(&self, id: Uuid) -> User {
        self.users.lock().unwrap()[&id].clone()
    }

    pub fn products_of(&self, seller_id: Uuid) -> usize {
        self.products
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.seller_id == seller_id)
            .count()
    }

    /// Favorite rows pointing at a listing, whoever saved them.
    pub fn favorites_of(&self, product_id: Uuid) -> usize {
        self.favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, pid)| *pid == product_id)
            .count()
    }

    pub fn notifications_for(&self, user_id: Uuid) -> Vec<StoredNotification> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }
}

pub struct MemoryUsers(pub Arc<Tables>);
pub struct MemoryProducts(pub Arc<Tables>);
pub struct MemoryOrders(pub Arc<Tables>);
pub struct MemoryReviews(pub Arc<Tables>);
pub struct MemoryFavorites(pub Arc<Tables>);
pub struct MemoryNotifications(pub Arc<Tables>);

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.0.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.phone == phone)
            .cloned())
    }

    async fn find_super_admin(&self) -> AppResult<Option<User>> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.is_super_admin())
            .cloned())
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.0.users.lock().unwrap();
        if users.values().any(|u| u.phone == user.phone) {
            return Err(AppError::conflict(messages::PHONE_TAKEN));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut users = self.0.users.lock().unwrap();
        match users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(user)
            }
            None => Err(AppError::not_found(messages::USER_NOT_FOUND)),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let removed: HashSet<Uuid> = {
            let mut products = self.0.products.lock().unwrap();
            let owned: HashSet<Uuid> = products
                .values()
                .filter(|p| p.seller_id == id)
                .map(|p| p.id)
                .collect();
            products.retain(|pid, _| !owned.contains(pid));
            owned
        };
        self.0
            .favorites
            .lock()
            .unwrap()
            .retain(|(user_id, product_id)| *user_id != id && !removed.contains(product_id));
        self.0
            .notifications
            .lock()
            .unwrap()
            .retain(|n| n.user_id != id);

        match self.0.users.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(messages::USER_NOT_FOUND)),
        }
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.0.users.lock().unwrap().values().cloned().collect())
    }

    async fn list_admins(&self) -> AppResult<Vec<User>> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.is_admin())
            .cloned()
            .collect())
    }

    async fn list_premium_requests(&self) -> AppResult<Vec<User>> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.premium_payment_pending)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProductRepository for MemoryProducts {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.0.products.lock().unwrap().get(&id).cloned())
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>> {
        let products = self.0.products.lock().unwrap();
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }

    async fn list(&self, status: Option<ProductStatus>) -> AppResult<Vec<Product>> {
        Ok(self
            .0
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect())
    }

    async fn list_by_seller(&self, seller_id: Uuid) -> AppResult<Vec<Product>> {
        Ok(self
            .0
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.seller_id == seller_id)
            .cloned()
            .collect())
    }

    async fn count_active_by_seller(&self, seller_id: Uuid) -> AppResult<u64> {
        Ok(self
            .0
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.seller_id == seller_id && p.status.is_active())
            .count() as u64)
    }

    async fn create(&self, product: Product) -> AppResult<Product> {
        self.0
            .products
            .lock()
            .unwrap()
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> AppResult<Product> {
        let mut products = self.0.products.lock().unwrap();
        match products.get_mut(&product.id) {
            Some(slot) => {
                *slot = product.clone();
                Ok(product)
            }
            None => Err(AppError::not_found(messages::PRODUCT_NOT_FOUND)),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.0
            .favorites
            .lock()
            .unwrap()
            .retain(|(_, product_id)| *product_id != id);
        match self.0.products.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(messages::PRODUCT_NOT_FOUND)),
        }
    }
}

#[async_trait]
impl OrderRepository for MemoryOrders {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        Ok(self.0.orders.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, order: Order) -> AppResult<Order> {
        self.0.orders.lock().unwrap().insert(order.id, order.clone());
        Ok(order)
    }

    async fn update(&self, order: Order) -> AppResult<Order> {
        let mut orders = self.0.orders.lock().unwrap();
        match orders.get_mut(&order.id) {
            Some(slot) => {
                *slot = order.clone();
                Ok(order)
            }
            None => Err(AppError::not_found(messages::ORDER_NOT_FOUND)),
        }
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        Ok(self
            .0
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list(&self, status: Option<OrderStatus>) -> AppResult<Vec<Order>> {
        Ok(self
            .0
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReviewRepository for MemoryReviews {
    async fn exists_for(&self, order_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        Ok(self
            .0
            .reviews
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.order_id == order_id && r.user_id == user_id))
    }

    async fn create(&self, review: Review) -> AppResult<Review> {
        {
            let mut reviews = self.0.reviews.lock().unwrap();
            if reviews
                .iter()
                .any(|r| r.order_id == review.order_id && r.user_id == review.user_id)
            {
                return Err(AppError::conflict(messages::REVIEW_ALREADY_SUBMITTED));
            }
            reviews.push(review.clone());
        }
        if let Some(order) = self.0.orders.lock().unwrap().get_mut(&review.order_id) {
            order.has_review = true;
        }
        Ok(review)
    }

    async fn list_by_product(&self, product_id: Uuid) -> AppResult<Vec<Review>> {
        Ok(self
            .0
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn list_by_seller(&self, seller_id: Uuid) -> AppResult<Vec<Review>> {
        Ok(self
            .0
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.seller_id == seller_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FavoriteRepository for MemoryFavorites {
    async fn add(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        self.0.favorites.lock().unwrap().insert((user_id, product_id));
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        Ok(self
            .0
            .favorites
            .lock()
            .unwrap()
            .remove(&(user_id, product_id)))
    }

    async fn list_product_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .0
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, pid)| *pid)
            .collect())
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotifications {
    async fn create_many(&self, notifications: Vec<StoredNotification>) -> AppResult<()> {
        self.0.notifications.lock().unwrap().extend(notifications);
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<StoredNotification>> {
        Ok(self.0.notifications_for(user_id))
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut notifications = self.0.notifications.lock().unwrap();
        match notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Every controller wired on one set of in-memory tables.
pub struct Market {
    pub tables: Arc<Tables>,
    pub auth: Authenticator,
    pub accounts: AccountManager,
    pub listings: ListingManager,
    pub orders: OrderManager,
    pub reviews: ReviewManager,
    pub favorites: FavoriteManager,
    pub notifications: NotificationManager,
}

impl Market {
    pub fn new() -> Self {
        let tables = Arc::new(Tables::default());
        let users = Arc::new(MemoryUsers(tables.clone()));
        let products = Arc::new(MemoryProducts(tables.clone()));
        let orders = Arc::new(MemoryOrders(tables.clone()));
        let reviews = Arc::new(MemoryReviews(tables.clone()));
        let favorites = Arc::new(MemoryFavorites(tables.clone()));
        let notifications = Arc::new(MemoryNotifications(tables.clone()));

        let notifier: Arc<dyn NotificationSender> =
            Arc::new(InAppNotifier::new(notifications.clone(), users.clone()));
        let jwt = JwtConfig {
            secret: "lifecycle-test-secret-with-enough-length".to_string(),
            expiration_hours: 1,
        };

        Self {
            auth: Authenticator::new(users.clone(), jwt),
            accounts: AccountManager::new(users.clone(), products.clone(), notifier.clone()),
            listings: ListingManager::new(products.clone(), users, notifier.clone()),
            orders: OrderManager::new(orders.clone(), products.clone(), notifier),
            reviews: ReviewManager::new(reviews, orders),
            favorites: FavoriteManager::new(favorites, products),
            notifications: NotificationManager::new(notifications),
            tables,
        }
    }

    /// Insert an account directly and return it as an acting session.
    pub fn seed_user(&self, name: &str, phone: &str, role: Role, tier: Tier) -> Actor {
        let mut user = User::new(
            Uuid::new_v4(),
            phone.to_string(),
            name.to_string(),
            "unused-hash".to_string(),
            Some("Dakar".to_string()),
        );
        user.role = role;
        user.tier = tier;
        let actor = Actor::from(&user);
        self.tables.users.lock().unwrap().insert(user.id, user);
        actor
    }

    /// Re-read the session after role or tier changes.
    pub fn refresh(&self, actor: &Actor) -> Actor {
        Actor::from(&self.tables.user(actor.id))
    }
}
