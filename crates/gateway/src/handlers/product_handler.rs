//! Listing handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use common::AppResult;
use domain::{NewProduct, Product, ProductPatch, Review};
use marketplace_service_lib::service::ProductQuery;

use crate::extractors::CurrentUser;
use crate::state::AppState;

/// Catalogue filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductSearchParams {
    /// Matches title, description or location, ignoring case
    pub search: Option<String>,
    pub category: Option<String>,
}

impl From<ProductSearchParams> for ProductQuery {
    fn from(params: ProductSearchParams) -> Self {
        Self {
            search: params.search,
            category: params.category,
        }
    }
}

/// Listing page: the listing and its reviews
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetails {
    pub product: Product,
    pub reviews: Vec<Review>,
}

/// Create listing routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/reviews", get(list_product_reviews))
        .route("/:id/favorite", post(add_favorite).delete(remove_favorite))
}

/// Browse the catalogue
///
/// Anonymous visitors and regular users see approved listings only; admins
/// see every listing.
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ProductSearchParams),
    responses(
        (status = 200, description = "Matching listings", body = Vec<Product>)
    )
)]
pub async fn list_products(
    viewer: Option<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<ProductSearchParams>,
) -> AppResult<Json<Vec<Product>>> {
    let viewer = viewer.map(|CurrentUser(actor)| actor);
    let products = state
        .services
        .listings()
        .list_products(viewer.as_ref(), params.into())
        .await?;
    Ok(Json(products))
}

/// Submit a listing for moderation
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = NewProduct,
    responses(
        (status = 201, description = "Listing submitted, pending moderation", body = Product),
        (status = 400, description = "Missing field or premium-only option"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Listing or image quota reached")
    )
)]
pub async fn create_product(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state
        .services
        .listings()
        .create_product(&actor, input)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Listing details with its reviews
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Listing details", body = ProductDetails),
        (status = 404, description = "Listing not found or not visible")
    )
)]
pub async fn get_product(
    viewer: Option<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductDetails>> {
    let viewer = viewer.map(|CurrentUser(actor)| actor);
    let listings = state.services.listings();
    let reviews = state.services.reviews();

    let (product, reviews) = futures::try_join!(
        listings.get_product(viewer.as_ref(), id),
        reviews.list_product_reviews(id)
    )?;
    Ok(Json(ProductDetails { product, reviews }))
}

/// Edit own listing
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Updated listing", body = Product),
        (status = 400, description = "Invalid field or premium-only option"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn update_product(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProductPatch>,
) -> AppResult<Json<Product>> {
    let product = state
        .services
        .listings()
        .update_product(&actor, id, patch)
        .await?;
    Ok(Json(product))
}

/// Delete a listing (owner or admin)
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn delete_product(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.listings().delete_product(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reviews left on a listing
#[utoipa::path(
    get,
    path = "/products/{id}/reviews",
    tag = "Reviews",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Reviews, newest first", body = Vec<Review>)
    )
)]
pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Review>>> {
    let reviews = state.services.reviews().list_product_reviews(id).await?;
    Ok(Json(reviews))
}

/// Save a listing to favorites
#[utoipa::path(
    post,
    path = "/products/{id}/favorite",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 204, description = "Saved"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Listing not found or not visible")
    )
)]
pub async fn add_favorite(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.favorites().add_favorite(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a listing from favorites
#[utoipa::path(
    delete,
    path = "/products/{id}/favorite",
    tag = "Favorites",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn remove_favorite(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.favorites().remove_favorite(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
