//! Marketplace business logic.
//!
//! Every controller takes the acting [`domain::Actor`] explicitly and
//! enforces its own authorization checks.

mod account_service;
mod auth_service;
mod container;
mod favorite_service;
mod listing_service;
mod notification_service;
mod order_service;
mod review_service;

pub use account_service::{AccountManager, AccountService};
pub use auth_service::{
    normalize_phone, AuthService, Authenticator, Claims, Registration, TokenResponse,
};
pub use container::{ServiceContainer, Services};
pub use favorite_service::{FavoriteManager, FavoriteService};
pub use listing_service::{ListingManager, ListingService, ProductQuery};
pub use notification_service::{
    InAppNotifier, NotificationManager, NotificationSender, NotificationService,
};
pub use order_service::{CartLine, OrderManager, OrderService};
pub use review_service::{ReviewManager, ReviewService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_service::MockNotificationSender;
