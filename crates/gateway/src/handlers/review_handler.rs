//! Review handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use common::AppResult;
use domain::{NewReview, Review, SellerRating};

use crate::extractors::CurrentUser;
use crate::state::AppState;

/// Create review routes
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(submit_review))
        .route("/sellers/:id/rating", get(seller_rating))
}

/// Review a completed order
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    request_body = NewReview,
    responses(
        (status = 201, description = "Review recorded", body = Review),
        (status = 400, description = "Order not completed or rating out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the buyer of this order"),
        (status = 409, description = "Order already reviewed")
    )
)]
pub async fn submit_review(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<NewReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let review = state.services.reviews().submit_review(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Average rating of a seller
#[utoipa::path(
    get,
    path = "/sellers/{id}/rating",
    tag = "Reviews",
    params(
        ("id" = Uuid, Path, description = "Seller ID")
    ),
    responses(
        (status = 200, description = "Seller rating", body = SellerRating)
    )
)]
pub async fn seller_rating(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SellerRating>> {
    let rating = state.services.reviews().seller_rating(id).await?;
    Ok(Json(rating))
}
