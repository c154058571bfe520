//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::UserResponse;
use marketplace_service_lib::service::{Registration, TokenResponse};

use crate::extractors::{CurrentUser, ValidatedJson};
use crate::state::AppState;

/// Account creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Phone number, also used as login
    #[validate(length(min = 1, message = "Le numéro de téléphone est obligatoire"))]
    #[schema(example = "77 123 45 67")]
    pub phone: String,
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    #[schema(example = "Awa Diop")]
    pub name: String,
    #[validate(length(min = 6, message = "Le mot de passe doit contenir au moins 6 caractères"))]
    pub password: String,
    #[schema(example = "Dakar")]
    pub location: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Le numéro de téléphone est obligatoire"))]
    #[schema(example = "771234567")]
    pub phone: String,
    #[validate(length(min = 1, message = "Le mot de passe est obligatoire"))]
    pub password: String,
}

/// Issued session
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

impl From<TokenResponse> for AuthResponse {
    fn from(token: TokenResponse) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            user: token.user,
        }
    }
}

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

/// Register a new account and open a session
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Phone number already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let token = state
        .services
        .auth()
        .register(Registration {
            phone: req.phone,
            name: req.name,
            password: req.password,
            location: req.location,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(token.into())))
}

/// Log in with phone number and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Unknown phone number or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token = state.services.auth().login(&req.phone, &req.password).await?;
    Ok(Json(token.into()))
}

/// Exchange a valid session for a fresh token
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "New token", body = AuthResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn refresh(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<AuthResponse>> {
    let token = state.services.auth().refresh_token(&actor).await?;
    Ok(Json(token.into()))
}
