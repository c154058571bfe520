//! Moderation and back-office handlers.
//!
//! Every route here checks the admin role again in the service layer; the
//! gateway only resolves the session.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use common::AppResult;
use domain::{Order, OrderStatus, Product, UserResponse};

use crate::extractors::CurrentUser;
use crate::state::AppState;

/// Rejection with an optional reason
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RejectRequest {
    #[schema(example = "Photos floues")]
    pub reason: Option<String>,
}

impl RejectRequest {
    fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or_default()
    }
}

/// Grant or revoke the admin role
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminToggleRequest {
    pub admin: bool,
}

/// Order queue filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderFilter {
    #[param(value_type = Option<OrderStatus>)]
    pub status: Option<OrderStatus>,
}

/// Create routes under `/admin`
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products/pending", get(list_pending_products))
        .route("/products/:id/approve", post(approve_product))
        .route("/products/:id/reject", post(reject_product))
        .route("/orders", get(list_orders))
        .route("/orders/:id/validate", post(validate_order))
        .route("/orders/:id/reject", post(reject_order))
        .route("/orders/:id/ship", post(ship_order))
        .route("/orders/:id/complete", post(complete_order))
        .route("/users", get(list_users))
        .route("/users/:id", delete(delete_user))
        .route("/users/:id/admin", put(set_admin))
        .route("/premium-requests", get(list_premium_requests))
        .route("/premium-requests/:id/approve", post(approve_premium))
        .route("/premium-requests/:id/reject", post(reject_premium))
}

// =============================================================================
// Listing moderation
// =============================================================================

/// Moderation queue
#[utoipa::path(
    get,
    path = "/admin/products/pending",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Listings awaiting moderation", body = Vec<Product>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_pending_products(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.services.listings().list_pending(&actor).await?;
    Ok(Json(products))
}

/// Publish a listing
#[utoipa::path(
    post,
    path = "/admin/products/{id}/approve",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Listing approved", body = Product),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn approve_product(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let product = state.services.listings().approve_product(&actor, id).await?;
    Ok(Json(product))
}

/// Refuse a listing; a blank reason uses the default message
#[utoipa::path(
    post,
    path = "/admin/products/{id}/reject",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Listing rejected", body = Product),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Listing not found"),
        (status = 409, description = "Listing already approved")
    )
)]
pub async fn reject_product(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<RejectRequest>>,
) -> AppResult<Json<Product>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let product = state
        .services
        .listings()
        .reject_product(&actor, id, req.reason())
        .await?;
    Ok(Json(product))
}

// =============================================================================
// Order fulfilment
// =============================================================================

/// All orders, optionally filtered by status
#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(OrderFilter),
    responses(
        (status = 200, description = "Orders, newest first", body = Vec<Order>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_orders(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state
        .services
        .orders()
        .list_orders(&actor, filter.status)
        .await?;
    Ok(Json(orders))
}

/// Confirm a reported payment
#[utoipa::path(
    post,
    path = "/admin/orders/{id}/validate",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Payment validated", body = Order),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "Order is not paid")
    )
)]
pub async fn validate_order(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = state.services.orders().validate_order(&actor, id).await?;
    Ok(Json(order))
}

/// Refuse a reported payment; the reason is mandatory
#[utoipa::path(
    post,
    path = "/admin/orders/{id}/reject",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Order rejected", body = Order),
        (status = 400, description = "Missing reason"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "Order is not paid")
    )
)]
pub async fn reject_order(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<RejectRequest>>,
) -> AppResult<Json<Order>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let order = state
        .services
        .orders()
        .reject_order(&actor, id, req.reason())
        .await?;
    Ok(Json(order))
}

/// Hand a validated order to delivery
#[utoipa::path(
    post,
    path = "/admin/orders/{id}/ship",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order shipped", body = Order),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "Order is not validated")
    )
)]
pub async fn ship_order(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = state.services.orders().ship_order(&actor, id).await?;
    Ok(Json(order))
}

/// Close a delivered order
#[utoipa::path(
    post,
    path = "/admin/orders/{id}/complete",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order completed", body = Order),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "Order is not shipped")
    )
)]
pub async fn complete_order(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = state.services.orders().complete_order(&actor, id).await?;
    Ok(Json(order))
}

// =============================================================================
// Accounts
// =============================================================================

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of all users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_users(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.services.accounts().list_users(&actor).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Delete an account with its listings, favorites and notifications
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Own account, super-admin, or not an admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.accounts().delete_user(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Grant or revoke admin (super-admin only)
#[utoipa::path(
    put,
    path = "/admin/users/{id}/admin",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = AdminToggleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserResponse),
        (status = 403, description = "Not the super-admin, or target is the super-admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn set_admin(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AdminToggleRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .accounts()
        .set_admin(&actor, id, req.admin)
        .await?;
    Ok(Json(user.into()))
}

/// Accounts waiting for premium approval
#[utoipa::path(
    get,
    path = "/admin/premium-requests",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending premium requests", body = Vec<UserResponse>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_premium_requests(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state
        .services
        .accounts()
        .list_premium_requests(&actor)
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Upgrade an account to premium after checking the payment
#[utoipa::path(
    post,
    path = "/admin/premium-requests/{id}/approve",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Account upgraded", body = UserResponse),
        (status = 400, description = "No pending request"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn approve_premium(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.accounts().approve_premium(&actor, id).await?;
    Ok(Json(user.into()))
}

/// Decline a premium request
#[utoipa::path(
    post,
    path = "/admin/premium-requests/{id}/reject",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Request declined", body = UserResponse),
        (status = 400, description = "No pending request"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn reject_premium(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.accounts().reject_premium(&actor, id).await?;
    Ok(Json(user.into()))
}
