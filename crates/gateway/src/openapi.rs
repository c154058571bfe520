//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::account_handler::{CanAddProductResponse, UpdateProfileRequest};
use crate::handlers::admin_handler::{AdminToggleRequest, RejectRequest};
use crate::handlers::auth_handler::{AuthResponse, LoginRequest, RegisterRequest};
use crate::handlers::health_handler::{HealthResponse, ServiceHealth};
use crate::handlers::notification_handler::NotificationResponse;
use crate::handlers::order_handler::{CheckoutItem, CheckoutRequest, MarkPaidRequest};
use crate::handlers::product_handler::ProductDetails;
use domain::{
    Condition, DeliveryDefaults, DeliveryInfo, ListingType, NewProduct, NewReview,
    NotificationKind, Order, OrderItem, OrderStatus, PaymentMethod, Product, ProductPatch,
    ProductSnapshot, ProductStatus, Review, Role, SellerRating, ServiceDetails, Tier,
    UserResponse,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::refresh,
        crate::handlers::account_handler::get_profile,
        crate::handlers::account_handler::update_profile,
        crate::handlers::account_handler::request_premium,
        crate::handlers::account_handler::list_my_products,
        crate::handlers::account_handler::can_add_product,
        crate::handlers::account_handler::list_my_orders,
        crate::handlers::account_handler::list_favorites,
        crate::handlers::notification_handler::list_notifications,
        crate::handlers::notification_handler::mark_notification_read,
        crate::handlers::product_handler::list_products,
        crate::handlers::product_handler::create_product,
        crate::handlers::product_handler::get_product,
        crate::handlers::product_handler::update_product,
        crate::handlers::product_handler::delete_product,
        crate::handlers::product_handler::list_product_reviews,
        crate::handlers::product_handler::add_favorite,
        crate::handlers::product_handler::remove_favorite,
        crate::handlers::order_handler::checkout,
        crate::handlers::order_handler::get_order,
        crate::handlers::order_handler::mark_paid,
        crate::handlers::review_handler::submit_review,
        crate::handlers::review_handler::seller_rating,
        crate::handlers::admin_handler::list_pending_products,
        crate::handlers::admin_handler::approve_product,
        crate::handlers::admin_handler::reject_product,
        crate::handlers::admin_handler::list_orders,
        crate::handlers::admin_handler::validate_order,
        crate::handlers::admin_handler::reject_order,
        crate::handlers::admin_handler::ship_order,
        crate::handlers::admin_handler::complete_order,
        crate::handlers::admin_handler::list_users,
        crate::handlers::admin_handler::delete_user,
        crate::handlers::admin_handler::set_admin,
        crate::handlers::admin_handler::list_premium_requests,
        crate::handlers::admin_handler::approve_premium,
        crate::handlers::admin_handler::reject_premium,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceHealth,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UpdateProfileRequest,
            CanAddProductResponse,
            NotificationResponse,
            NotificationKind,
            ProductDetails,
            CheckoutItem,
            CheckoutRequest,
            MarkPaidRequest,
            RejectRequest,
            AdminToggleRequest,
            UserResponse,
            Role,
            Tier,
            DeliveryDefaults,
            Product,
            NewProduct,
            ProductPatch,
            ProductStatus,
            ListingType,
            Condition,
            ServiceDetails,
            Order,
            OrderItem,
            OrderStatus,
            PaymentMethod,
            ProductSnapshot,
            DeliveryInfo,
            Review,
            NewReview,
            SellerRating,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and dependency checks"),
        (name = "Authentication", description = "Registration and sessions"),
        (name = "Account", description = "The caller's own account"),
        (name = "Notifications", description = "In-app notifications"),
        (name = "Products", description = "Listings and the public catalogue"),
        (name = "Favorites", description = "Saved listings"),
        (name = "Orders", description = "Checkout and payment reporting"),
        (name = "Reviews", description = "Reviews on completed orders"),
        (name = "Admin", description = "Moderation, fulfilment and account management"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
