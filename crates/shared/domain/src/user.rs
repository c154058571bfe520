//! User domain entity, roles, tiers and the acting session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    ROLE_ADMIN, ROLE_BUYER, ROLE_SELLER, ROLE_SUPER_ADMIN, TIER_PREMIUM, TIER_STANDARD,
};

/// Account role.
///
/// A single tagged value replaces the independent admin/super-admin flags,
/// so an account can never be super-admin without also being an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Role {
    Buyer,
    Seller,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Moderation capability (listing approval, order validation, user deletion).
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Authority over admin grants.
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => ROLE_BUYER,
            Role::Seller => ROLE_SELLER,
            Role::Admin => ROLE_ADMIN,
            Role::SuperAdmin => ROLE_SUPER_ADMIN,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            ROLE_SELLER => Role::Seller,
            ROLE_ADMIN => Role::Admin,
            ROLE_SUPER_ADMIN => Role::SuperAdmin,
            _ => Role::Buyer,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::from(s.as_str())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription class gating quotas and premium features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Tier {
    #[default]
    Standard,
    Premium,
}

impl Tier {
    pub fn is_premium(&self) -> bool {
        matches!(self, Tier::Premium)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Standard => TIER_STANDARD,
            Tier::Premium => TIER_PREMIUM,
        }
    }
}

impl From<&str> for Tier {
    fn from(s: &str) -> Self {
        match s {
            TIER_PREMIUM => Tier::Premium,
            _ => Tier::Standard,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery defaults used to prefill checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeliveryDefaults {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub phone: String,
    pub name: String,
    pub avatar: Option<String>,
    pub location: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub tier: Tier,
    pub premium_payment_pending: bool,
    pub premium_request_date: Option<DateTime<Utc>>,
    pub delivery: DeliveryDefaults,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered account: standard tier, buyer role.
    pub fn new(
        id: Uuid,
        phone: String,
        name: String,
        password_hash: String,
        location: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            phone,
            name,
            avatar: None,
            location,
            password_hash,
            role: Role::Buyer,
            tier: Tier::Standard,
            premium_payment_pending: false,
            premium_request_date: None,
            delivery: DeliveryDefaults::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    pub fn is_premium(&self) -> bool {
        self.tier.is_premium()
    }

    /// Mark the account as a seller after its first listing.
    ///
    /// Returns true when the role actually changed.
    pub fn promote_to_seller(&mut self) -> bool {
        if self.role == Role::Buyer {
            self.role = Role::Seller;
            self.updated_at = Utc::now();
            true
        } else {
            false
        }
    }

    /// Record a premium upgrade request awaiting payment reconciliation.
    pub fn request_premium(&mut self) {
        let now = Utc::now();
        self.premium_payment_pending = true;
        self.premium_request_date = Some(now);
        self.updated_at = now;
    }

    pub fn approve_premium(&mut self) {
        self.tier = Tier::Premium;
        self.premium_payment_pending = false;
        self.updated_at = Utc::now();
    }

    /// Clear the pending request, tier unchanged.
    pub fn reject_premium(&mut self) {
        self.premium_payment_pending = false;
        self.updated_at = Utc::now();
    }

    pub fn grant_admin(&mut self) {
        self.role = Role::Admin;
        self.updated_at = Utc::now();
    }

    /// Drop admin capability, falling back to the role implied by ownership.
    pub fn revoke_admin(&mut self, owns_listings: bool) {
        self.role = if owns_listings {
            Role::Seller
        } else {
            Role::Buyer
        };
        self.updated_at = Utc::now();
    }

    pub fn promote_to_super_admin(&mut self) {
        self.role = Role::SuperAdmin;
        self.updated_at = Utc::now();
    }

    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(location) = update.location {
            self.location = Some(location);
        }
        if let Some(delivery) = update.delivery {
            self.delivery = delivery;
        }
        self.updated_at = Utc::now();
    }
}

/// Profile fields a user may change on their own account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub delivery: Option<DeliveryDefaults>,
}

/// The authenticated party performing an operation.
///
/// Built once per request from the stored user and passed explicitly to
/// every controller call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub tier: Tier,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    pub fn is_premium(&self) -> bool {
        self.tier.is_premium()
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            tier: user.tier,
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    pub id: Uuid,
    pub phone: String,
    pub name: String,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub role: Role,
    pub tier: Tier,
    pub premium_payment_pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium_request_date: Option<DateTime<Utc>>,
    pub delivery: DeliveryDefaults,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            phone: user.phone,
            name: user.name,
            avatar: user.avatar,
            location: user.location,
            role: user.role,
            tier: user.tier,
            premium_payment_pending: user.premium_payment_pending,
            premium_request_date: user.premium_request_date,
            delivery: user.delivery,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            Uuid::new_v4(),
            "771234567".to_string(),
            "Awa".to_string(),
            "hash".to_string(),
            Some("Dakar".to_string()),
        )
    }

    #[test]
    fn test_new_user_is_standard_buyer() {
        let user = user();
        assert_eq!(user.role, Role::Buyer);
        assert_eq!(user.tier, Tier::Standard);
        assert!(!user.premium_payment_pending);
    }

    #[test]
    fn test_role_capabilities() {
        assert!(!Role::Buyer.is_admin());
        assert!(!Role::Seller.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Admin.is_super_admin());
        assert!(Role::SuperAdmin.is_admin());
        assert!(Role::SuperAdmin.is_super_admin());
    }

    #[test]
    fn test_role_round_trips_through_storage_text() {
        for role in [Role::Buyer, Role::Seller, Role::Admin, Role::SuperAdmin] {
            assert_eq!(Role::from(role.as_str()), role);
        }
        assert_eq!(Role::from("unknown"), Role::Buyer);
    }

    #[test]
    fn test_premium_request_then_reject_keeps_tier() {
        let mut user = user();
        user.request_premium();
        assert!(user.premium_payment_pending);
        assert!(user.premium_request_date.is_some());

        user.reject_premium();
        assert!(!user.premium_payment_pending);
        assert_eq!(user.tier, Tier::Standard);
    }

    #[test]
    fn test_premium_approve() {
        let mut user = user();
        user.request_premium();
        user.approve_premium();
        assert!(user.is_premium());
        assert!(!user.premium_payment_pending);
    }

    #[test]
    fn test_promote_to_seller_only_from_buyer() {
        let mut user = user();
        assert!(user.promote_to_seller());
        assert!(!user.promote_to_seller());

        user.grant_admin();
        assert!(!user.promote_to_seller());
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_revoke_admin_falls_back_to_ownership_role() {
        let mut user = user();
        user.grant_admin();
        user.revoke_admin(true);
        assert_eq!(user.role, Role::Seller);

        user.grant_admin();
        user.revoke_admin(false);
        assert_eq!(user.role, Role::Buyer);
    }
}
