//! Account administration - profiles, premium upgrades, admin grants and
//! deletion.
//!
//! The super-admin can never be demoted or deleted through this service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{messages, policy, Actor, Notification, ProfileUpdate, User};

use crate::repository::{ProductRepository, UserRepository};
use crate::service::auth_service::normalize_phone;
use crate::service::notification_service::{notify, notify_admins, NotificationSender};

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn get_profile(&self, actor: &Actor) -> AppResult<User>;

    async fn update_profile(&self, actor: &Actor, update: ProfileUpdate) -> AppResult<User>;

    /// Flag the account as awaiting premium payment reconciliation
    async fn request_premium(&self, actor: &Actor) -> AppResult<User>;

    async fn approve_premium(&self, actor: &Actor, user_id: Uuid) -> AppResult<User>;

    async fn reject_premium(&self, actor: &Actor, user_id: Uuid) -> AppResult<User>;

    /// Grant or revoke admin (super-admin only)
    async fn set_admin(&self, actor: &Actor, user_id: Uuid, admin: bool) -> AppResult<User>;

    /// Remove the account with its listings, favorites and notifications
    async fn delete_user(&self, actor: &Actor, user_id: Uuid) -> AppResult<()>;

    async fn list_users(&self, actor: &Actor) -> AppResult<Vec<User>>;

    async fn list_premium_requests(&self, actor: &Actor) -> AppResult<Vec<User>>;

    /// Promote the configured account to super-admin when none exists yet.
    ///
    /// Returns the promoted account, or `None` when nothing changed.
    async fn bootstrap_super_admin(&self, phone: &str) -> AppResult<Option<User>>;
}

pub struct AccountManager {
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
    notifier: Arc<dyn NotificationSender>,
}

impl AccountManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            users,
            products,
            notifier,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_not_found(messages::USER_NOT_FOUND)
    }

    async fn pending_premium(&self, actor: &Actor, user_id: Uuid) -> AppResult<User> {
        policy::require_admin(actor)?;
        let user = self.load(user_id).await?;
        if !user.premium_payment_pending {
            return Err(AppError::validation(messages::NO_PREMIUM_REQUEST));
        }
        Ok(user)
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn get_profile(&self, actor: &Actor) -> AppResult<User> {
        self.load(actor.id).await
    }

    async fn update_profile(&self, actor: &Actor, mut update: ProfileUpdate) -> AppResult<User> {
        if let Some(name) = update.name.take() {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::validation(messages::NAME_REQUIRED));
            }
            update.name = Some(name.to_string());
        }

        let mut user = self.load(actor.id).await?;
        user.apply_profile(update);
        self.users.update(user).await
    }

    async fn request_premium(&self, actor: &Actor) -> AppResult<User> {
        let mut user = self.load(actor.id).await?;
        if user.is_premium() {
            return Err(AppError::Conflict(messages::ALREADY_PREMIUM.to_string()));
        }
        if user.premium_payment_pending {
            return Err(AppError::Conflict(
                messages::PREMIUM_ALREADY_PENDING.to_string(),
            ));
        }

        user.request_premium();
        let user = self.users.update(user).await?;
        info!(user_id = %user.id, "Premium upgrade requested");

        notify_admins(self.notifier.as_ref(), Notification::premium_requested(&user)).await;
        Ok(user)
    }

    async fn approve_premium(&self, actor: &Actor, user_id: Uuid) -> AppResult<User> {
        let mut user = self.pending_premium(actor, user_id).await?;

        user.approve_premium();
        let user = self.users.update(user).await?;
        info!(user_id = %user.id, admin_id = %actor.id, "Premium upgrade approved");

        notify(self.notifier.as_ref(), user.id, Notification::premium_approved(&user)).await;
        Ok(user)
    }

    async fn reject_premium(&self, actor: &Actor, user_id: Uuid) -> AppResult<User> {
        let mut user = self.pending_premium(actor, user_id).await?;

        user.reject_premium();
        let user = self.users.update(user).await?;
        info!(user_id = %user.id, admin_id = %actor.id, "Premium upgrade rejected");

        notify(self.notifier.as_ref(), user.id, Notification::premium_rejected(&user)).await;
        Ok(user)
    }

    async fn set_admin(&self, actor: &Actor, user_id: Uuid, admin: bool) -> AppResult<User> {
        policy::require_super_admin(actor)?;
        let mut user = self.load(user_id).await?;
        policy::check_admin_toggle(actor, &user)?;

        if admin {
            user.grant_admin();
        } else {
            let owns_listings = !self.products.list_by_seller(user.id).await?.is_empty();
            user.revoke_admin(owns_listings);
        }

        let user = self.users.update(user).await?;
        info!(
            user_id = %user.id,
            role = user.role.as_str(),
            "Admin capability changed"
        );
        Ok(user)
    }

    async fn delete_user(&self, actor: &Actor, user_id: Uuid) -> AppResult<()> {
        policy::require_admin(actor)?;
        let user = self.load(user_id).await?;
        policy::check_user_deletion(actor, &user)?;

        self.users.delete(user.id).await?;
        info!(user_id = %user_id, admin_id = %actor.id, "User deleted");
        Ok(())
    }

    async fn list_users(&self, actor: &Actor) -> AppResult<Vec<User>> {
        policy::require_admin(actor)?;
        self.users.list().await
    }

    async fn list_premium_requests(&self, actor: &Actor) -> AppResult<Vec<User>> {
        policy::require_admin(actor)?;
        self.users.list_premium_requests().await
    }

    async fn bootstrap_super_admin(&self, phone: &str) -> AppResult<Option<User>> {
        let phone = normalize_phone(phone);
        if let Some(existing) = self.users.find_super_admin().await? {
            if existing.phone != phone {
                warn!(
                    super_admin_id = %existing.id,
                    "A super-admin already exists, ignoring configured phone"
                );
            }
            return Ok(None);
        }

        let Some(mut user) = self.users.find_by_phone(&phone).await? else {
            warn!("No account registered for the configured super-admin phone");
            return Ok(None);
        };

        user.promote_to_super_admin();
        let user = self.users.update(user).await?;
        info!(user_id = %user.id, "Super-admin promoted");
        Ok(Some(user))
    }
}
