//! Repository layer for data access.
//!
//! One trait per table, each with a SeaORM-backed `*Store`. Cascades that
//! touch several tables run inside a single transaction in the store.

pub mod entities;
mod favorite_repository;
mod notification_repository;
mod order_repository;
mod product_repository;
mod review_repository;
mod user_repository;

pub use favorite_repository::{FavoriteRepository, FavoriteStore};
pub use notification_repository::{NotificationRepository, NotificationStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use review_repository::{ReviewRepository, ReviewStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use favorite_repository::MockFavoriteRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_repository::MockNotificationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
