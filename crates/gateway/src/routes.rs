//! Route configuration.

use axum::{middleware, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    account_routes, admin_routes, auth_routes, health_routes, order_routes, product_routes,
    review_routes,
};
use crate::middleware::session_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Handlers decide whether a session is required; the middleware only
    // resolves the bearer token when one is sent.
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/me", account_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/admin", admin_routes())
        .merge(review_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        // Health check (no session)
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .with_state(state)
}
