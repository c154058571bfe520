//! Domain layer - Marketplace entities, lifecycle rules and authorization.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Listing moderation and the order state machine live here so that both the
//! service layer and the tests can exercise them without a database.

pub mod cart;
pub mod constants;
pub mod error;
pub mod messages;
pub mod notification;
pub mod order;
pub mod password;
pub mod policy;
pub mod product;
pub mod review;
pub mod user;

pub use cart::{Cart, CartItem};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use notification::{Notification, NotificationKind, StoredNotification};
pub use order::{DeliveryInfo, Order, OrderItem, OrderStatus, PaymentMethod, ProductSnapshot};
pub use password::Password;
pub use product::{
    Condition, ListingType, NewProduct, Product, ProductPatch, ProductStatus, ServiceDetails,
};
pub use review::{NewReview, Review, SellerRating};
pub use user::{Actor, DeliveryDefaults, ProfileUpdate, Role, Tier, User, UserResponse};
