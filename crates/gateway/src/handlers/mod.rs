//! HTTP handlers.

pub mod account_handler;
pub mod admin_handler;
pub mod auth_handler;
pub mod health_handler;
pub mod notification_handler;
pub mod order_handler;
pub mod product_handler;
pub mod review_handler;

pub use account_handler::account_routes;
pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use health_handler::health_routes;
pub use order_handler::order_routes;
pub use product_handler::product_routes;
pub use review_handler::review_routes;
