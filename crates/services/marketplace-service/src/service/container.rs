//! Service container - single entry point handing out the marketplace
//! controllers behind their traits.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use common::JwtConfig;

use super::{
    AccountManager, AccountService, AuthService, Authenticator, FavoriteManager, FavoriteService,
    InAppNotifier, ListingManager, ListingService, NotificationManager, NotificationSender,
    NotificationService, OrderManager, OrderService, ReviewManager, ReviewService,
};
use crate::repository::{
    FavoriteStore, NotificationStore, OrderStore, ProductStore, ReviewStore, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn listings(&self) -> Arc<dyn ListingService>;

    fn orders(&self) -> Arc<dyn OrderService>;

    fn reviews(&self) -> Arc<dyn ReviewService>;

    fn favorites(&self) -> Arc<dyn FavoriteService>;

    fn notifications(&self) -> Arc<dyn NotificationService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    accounts: Arc<dyn AccountService>,
    listings: Arc<dyn ListingService>,
    orders: Arc<dyn OrderService>,
    reviews: Arc<dyn ReviewService>,
    favorites: Arc<dyn FavoriteService>,
    notifications: Arc<dyn NotificationService>,
}

impl Services {
    /// Wire every store and controller on top of one connection pool.
    pub fn from_connection(db: DatabaseConnection, jwt: JwtConfig) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let products = Arc::new(ProductStore::new(db.clone()));
        let orders = Arc::new(OrderStore::new(db.clone()));
        let reviews = Arc::new(ReviewStore::new(db.clone()));
        let favorites = Arc::new(FavoriteStore::new(db.clone()));
        let notifications = Arc::new(NotificationStore::new(db));

        let notifier: Arc<dyn NotificationSender> =
            Arc::new(InAppNotifier::new(notifications.clone(), users.clone()));

        Self {
            auth: Arc::new(Authenticator::new(users.clone(), jwt)),
            accounts: Arc::new(AccountManager::new(
                users.clone(),
                products.clone(),
                notifier.clone(),
            )),
            listings: Arc::new(ListingManager::new(
                products.clone(),
                users,
                notifier.clone(),
            )),
            orders: Arc::new(OrderManager::new(orders.clone(), products.clone(), notifier)),
            reviews: Arc::new(ReviewManager::new(reviews, orders)),
            favorites: Arc::new(FavoriteManager::new(favorites, products)),
            notifications: Arc::new(NotificationManager::new(notifications)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.accounts.clone()
    }

    fn listings(&self) -> Arc<dyn ListingService> {
        self.listings.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.orders.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewService> {
        self.reviews.clone()
    }

    fn favorites(&self) -> Arc<dyn FavoriteService> {
        self.favorites.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationService> {
        self.notifications.clone()
    }
}
