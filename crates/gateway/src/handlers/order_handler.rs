//! Checkout and buyer-side order handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{DeliveryInfo, Order};
use marketplace_service_lib::service::CartLine;

use crate::extractors::{CurrentUser, ValidatedJson};
use crate::state::AppState;

/// One cart line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    #[schema(example = 1)]
    pub quantity: u32,
}

impl From<CheckoutItem> for CartLine {
    fn from(item: CheckoutItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

/// Checkout request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "Votre panier est vide"))]
    pub items: Vec<CheckoutItem>,
    pub delivery: DeliveryInfo,
    /// Wave transaction reference; when present the order starts out paid
    #[schema(example = "T_ABC123")]
    pub transaction_reference: Option<String>,
}

/// Payment report
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MarkPaidRequest {
    #[schema(example = "T_ABC123")]
    pub transaction_reference: Option<String>,
}

/// Create order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout))
        .route("/:id", get(get_order))
        .route("/:id/pay", post(mark_paid))
}

/// Place an order for the given cart lines
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Empty cart, unavailable listing or incomplete delivery"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn checkout(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let orders = state.services.orders();
    let lines: Vec<CartLine> = req.items.into_iter().map(Into::into).collect();

    let mut cart = orders.fill_cart(&lines).await?;
    let order = orders
        .checkout(&actor, &mut cart, req.delivery, req.transaction_reference)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Order details (buyer or admin)
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your order"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = state.services.orders().get_order(&actor, id).await?;
    Ok(Json(order))
}

/// Report the Wave payment of a pending order
#[utoipa::path(
    post,
    path = "/orders/{id}/pay",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body(content = MarkPaidRequest, description = "Optional; the reference may be omitted"),
    responses(
        (status = 200, description = "Order marked as paid", body = Order),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your order"),
        (status = 409, description = "Order is not awaiting payment")
    )
)]
pub async fn mark_paid(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<MarkPaidRequest>>,
) -> AppResult<Json<Order>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let order = state
        .services
        .orders()
        .mark_paid(&actor, id, req.transaction_reference)
        .await?;
    Ok(Json(order))
}
