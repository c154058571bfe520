//! Handlers for the caller's own account.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{DeliveryDefaults, Order, Product, ProfileUpdate, UserResponse};

use crate::extractors::{CurrentUser, ValidatedJson};
use crate::handlers::notification_handler::{list_notifications, mark_notification_read};
use crate::state::AppState;

/// Profile update request. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    #[schema(example = "Awa Diop")]
    pub name: Option<String>,
    #[validate(url(message = "Lien d'avatar invalide"))]
    pub avatar: Option<String>,
    #[schema(example = "Thiès")]
    pub location: Option<String>,
    /// Defaults used to prefill checkout
    pub delivery: Option<DeliveryDefaults>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            avatar: req.avatar,
            location: req.location,
            delivery: req.delivery,
        }
    }
}

/// Whether the quota leaves room for another listing
#[derive(Debug, Serialize, ToSchema)]
pub struct CanAddProductResponse {
    pub can_add: bool,
}

/// Create routes under `/me`
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/premium", post(request_premium))
        .route("/products", get(list_my_products))
        .route("/can-add-product", get(can_add_product))
        .route("/orders", get(list_my_orders))
        .route("/favorites", get(list_favorites))
        .route("/notifications", get(list_notifications))
        .route("/notifications/:id/read", post(mark_notification_read))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/me",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_profile(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.accounts().get_profile(&actor).await?;
    Ok(Json(user.into()))
}

/// Update own profile
#[utoipa::path(
    put,
    path = "/me",
    tag = "Account",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_profile(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .accounts()
        .update_profile(&actor, req.into())
        .await?;
    Ok(Json(user.into()))
}

/// Ask for the premium tier; admins are alerted to check the payment
#[utoipa::path(
    post,
    path = "/me/premium",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request recorded", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Already premium or a request is pending")
    )
)]
pub async fn request_premium(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.accounts().request_premium(&actor).await?;
    Ok(Json(user.into()))
}

/// Own listings in every moderation status
#[utoipa::path(
    get,
    path = "/me/products",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own listings", body = Vec<Product>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_my_products(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.services.listings().list_my_products(&actor).await?;
    Ok(Json(products))
}

/// Whether another listing may be submitted right now
#[utoipa::path(
    get,
    path = "/me/can-add-product",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Quota check", body = CanAddProductResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn can_add_product(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<CanAddProductResponse>> {
    let can_add = state.services.listings().can_add_product(&actor).await?;
    Ok(Json(CanAddProductResponse { can_add }))
}

/// Own orders, newest first
#[utoipa::path(
    get,
    path = "/me/orders",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own orders", body = Vec<Order>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_my_orders(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.services.orders().list_my_orders(&actor).await?;
    Ok(Json(orders))
}

/// Saved listings that are still visible
#[utoipa::path(
    get,
    path = "/me/favorites",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Favorite listings", body = Vec<Product>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_favorites(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.services.favorites().list_favorites(&actor).await?;
    Ok(Json(products))
}
