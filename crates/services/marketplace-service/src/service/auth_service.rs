//! Authentication service - phone/password accounts and JWT sessions.
//!
//! Passwords go through the domain `Password` value object. Tokens only
//! carry the user id; every request reloads the user so role and tier
//! changes apply immediately.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::{
    messages, Actor, Password, User, UserResponse, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER,
};

use crate::repository::UserRepository;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub phone: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiration time in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub phone: String,
    pub name: String,
    pub password: String,
    pub location: Option<String>,
}

/// Strip whitespace so "77 123 45 67" and "771234567" are the same account.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a buyer account and open a session for it
    async fn register(&self, registration: Registration) -> AppResult<TokenResponse>;

    /// Unknown phone and wrong password are reported separately
    async fn login(&self, phone: &str, password: &str) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to the current state of its account
    async fn authenticate(&self, token: &str) -> AppResult<Actor>;

    /// New token from fresh user data
    async fn refresh_token(&self, actor: &Actor) -> AppResult<TokenResponse>;
}

pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    jwt: JwtConfig,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    fn generate_token(&self, user: User) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.jwt.expiration_hours);

        let claims = Claims {
            sub: user.id,
            phone: user.phone.clone(),
            role: user.role.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt.secret_bytes()),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.jwt.expiration_hours * SECONDS_PER_HOUR,
            user: UserResponse::from(user),
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, registration: Registration) -> AppResult<TokenResponse> {
        let phone = normalize_phone(&registration.phone);
        if phone.is_empty() {
            return Err(AppError::validation(messages::PHONE_REQUIRED));
        }
        let name = registration.name.trim();
        if name.is_empty() {
            return Err(AppError::validation(messages::NAME_REQUIRED));
        }

        if self.users.find_by_phone(&phone).await?.is_some() {
            return Err(AppError::conflict(messages::PHONE_TAKEN));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let location = registration
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        let user = User::new(
            Uuid::new_v4(),
            phone,
            name.to_string(),
            password_hash,
            location,
        );
        let user = self.users.create(user).await?;
        info!(user_id = %user.id, "User registered");

        self.generate_token(user)
    }

    async fn login(&self, phone: &str, password: &str) -> AppResult<TokenResponse> {
        let user = self
            .users
            .find_by_phone(&normalize_phone(phone))
            .await?
            .ok_or_else(|| AppError::InvalidCredentials(messages::UNKNOWN_PHONE.to_string()))?;

        if !Password::from_hash(user.password_hash.as_str()).verify(password) {
            return Err(AppError::InvalidCredentials(
                messages::WRONG_PASSWORD.to_string(),
            ));
        }

        info!(user_id = %user.id, "User logged in");
        self.generate_token(user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt.secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn authenticate(&self, token: &str) -> AppResult<Actor> {
        let claims = self.verify_token(token)?;
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized(messages::LOGIN_REQUIRED))?;
        Ok(Actor::from(&user))
    }

    async fn refresh_token(&self, actor: &Actor) -> AppResult<TokenResponse> {
        let user = self
            .users
            .find_by_id(actor.id)
            .await?
            .ok_or_else(|| AppError::unauthorized(messages::LOGIN_REQUIRED))?;
        self.generate_token(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Role, Tier};
    use mockall::predicate::eq;

    use crate::repository::MockUserRepository;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            expiration_hours: 24,
        }
    }

    fn stored_user(phone: &str, password: &str) -> User {
        User::new(
            Uuid::new_v4(),
            phone.to_string(),
            "Ibrahima".to_string(),
            Password::new(password).unwrap().into_string(),
            None,
        )
    }

    fn registration(phone: &str) -> Registration {
        Registration {
            phone: phone.to_string(),
            name: "  Ibrahima ".to_string(),
            password: "secret123".to_string(),
            location: Some("Ziguinchor".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_creates_standard_buyer() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_phone()
            .withf(|phone| phone == "771234567")
            .returning(|_| Ok(None));
        users.expect_create().times(1).returning(|u| Ok(u));

        let auth = Authenticator::new(Arc::new(users), jwt());
        let response = auth.register(registration("77 123 45 67")).await.unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 24 * 3600);
        assert_eq!(response.user.phone, "771234567");
        assert_eq!(response.user.name, "Ibrahima");
        assert_eq!(response.user.role, Role::Buyer);
        assert_eq!(response.user.tier, Tier::Standard);
    }

    #[tokio::test]
    async fn test_register_duplicate_phone() {
        let existing = stored_user("771234567", "secret123");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_phone()
            .returning(move |_| Ok(Some(existing.clone())));
        users.expect_create().never();

        let auth = Authenticator::new(Arc::new(users), jwt());
        let err = auth.register(registration("771234567")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), messages::PHONE_TAKEN);
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_phone().returning(|_| Ok(None));
        users.expect_create().never();

        let auth = Authenticator::new(Arc::new(users), jwt());
        let mut input = registration("771234567");
        input.password = "abc".to_string();

        let err = auth.register(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_distinguishes_unknown_phone_and_wrong_password() {
        let user = stored_user("771234567", "secret123");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_phone()
            .withf(|phone| phone == "771234567")
            .returning(move |_| Ok(Some(user.clone())));
        users.expect_find_by_phone().returning(|_| Ok(None));

        let auth = Authenticator::new(Arc::new(users), jwt());

        let err = auth.login("700000000", "secret123").await.unwrap_err();
        assert_eq!(err.to_string(), messages::UNKNOWN_PHONE);

        let err = auth.login("771234567", "wrong-pass").await.unwrap_err();
        assert_eq!(err.to_string(), messages::WRONG_PASSWORD);

        assert!(auth.login("771234567", "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_reloads_current_role() {
        let mut user = stored_user("771234567", "secret123");
        let user_id = user.id;
        let token = Authenticator::new(Arc::new(MockUserRepository::new()), jwt())
            .generate_token(user.clone())
            .unwrap()
            .access_token;

        // Promoted after the token was issued
        user.grant_admin();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(user.clone())));

        let auth = Authenticator::new(Arc::new(users), jwt());
        let actor = auth.authenticate(&token).await.unwrap();
        assert_eq!(actor.id, user_id);
        assert_eq!(actor.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_authenticate_deleted_account() {
        let user = stored_user("771234567", "secret123");
        let token = Authenticator::new(Arc::new(MockUserRepository::new()), jwt())
            .generate_token(user)
            .unwrap()
            .access_token;

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let auth = Authenticator::new(Arc::new(users), jwt());
        let err = auth.authenticate(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let user = stored_user("771234567", "secret123");
        let token = Authenticator::new(Arc::new(MockUserRepository::new()), jwt())
            .generate_token(user)
            .unwrap()
            .access_token;

        let other = JwtConfig {
            secret: "another-secret-that-is-also-long-enough".to_string(),
            expiration_hours: 24,
        };
        let auth = Authenticator::new(Arc::new(MockUserRepository::new()), other);
        assert!(matches!(auth.verify_token(&token), Err(AppError::Jwt(_))));
    }
}
