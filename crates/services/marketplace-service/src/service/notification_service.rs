//! Notification port and its in-app adapter.
//!
//! Controllers publish a [`Notification`] through [`NotificationSender`] and
//! never fail because of it: delivery is best-effort.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{messages, Actor, Notification, StoredNotification};

use crate::repository::{NotificationRepository, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Outbound notification port.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, user_id: Uuid, notification: Notification) -> AppResult<()>;

    /// Fan out to every admin and the super-admin
    async fn send_to_admins(&self, notification: Notification) -> AppResult<()>;
}

/// Deliver to one user, logging instead of failing.
pub(crate) async fn notify(sender: &dyn NotificationSender, user_id: Uuid, notification: Notification) {
    let kind = notification.kind;
    if let Err(e) = sender.send(user_id, notification).await {
        warn!(%user_id, kind = kind.as_str(), "Notification delivery failed: {}", e);
    }
}

/// Deliver to all admins, logging instead of failing.
pub(crate) async fn notify_admins(sender: &dyn NotificationSender, notification: Notification) {
    let kind = notification.kind;
    if let Err(e) = sender.send_to_admins(notification).await {
        warn!(kind = kind.as_str(), "Admin notification delivery failed: {}", e);
    }
}

/// Adapter persisting one notification row per recipient.
pub struct InAppNotifier {
    notifications: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
}

impl InAppNotifier {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            notifications,
            users,
        }
    }

    fn stored(user_id: Uuid, notification: &Notification) -> StoredNotification {
        StoredNotification {
            id: Uuid::new_v4(),
            user_id,
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            data: notification.data.clone(),
            read: false,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
impl NotificationSender for InAppNotifier {
    async fn send(&self, user_id: Uuid, notification: Notification) -> AppResult<()> {
        self.notifications
            .create_many(vec![Self::stored(user_id, &notification)])
            .await
    }

    async fn send_to_admins(&self, notification: Notification) -> AppResult<()> {
        let rows = self
            .users
            .list_admins()
            .await?
            .iter()
            .map(|admin| Self::stored(admin.id, &notification))
            .collect();
        self.notifications.create_many(rows).await
    }
}

/// Read side of the in-app inbox.
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn list_notifications(&self, actor: &Actor) -> AppResult<Vec<StoredNotification>>;

    async fn mark_notification_read(&self, actor: &Actor, id: Uuid) -> AppResult<()>;
}

pub struct NotificationManager {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationManager {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl NotificationService for NotificationManager {
    async fn list_notifications(&self, actor: &Actor) -> AppResult<Vec<StoredNotification>> {
        self.repo.list_by_user(actor.id).await
    }

    async fn mark_notification_read(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        if self.repo.mark_read(id, actor.id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(messages::NOTIFICATION_NOT_FOUND))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Role, Tier, User};
    use mockall::predicate::eq;

    use crate::repository::{MockNotificationRepository, MockUserRepository};

    fn admin() -> User {
        let mut user = User::new(
            Uuid::new_v4(),
            "770000000".to_string(),
            "Admin".to_string(),
            "hash".to_string(),
            None,
        );
        user.role = Role::Admin;
        user
    }

    fn sample() -> Notification {
        let user = User::new(
            Uuid::new_v4(),
            "771234567".to_string(),
            "Awa".to_string(),
            "hash".to_string(),
            None,
        );
        Notification::premium_requested(&user)
    }

    #[tokio::test]
    async fn test_send_to_admins_writes_one_row_per_admin() {
        let admins = vec![admin(), admin()];
        let ids: Vec<Uuid> = admins.iter().map(|a| a.id).collect();

        let mut users = MockUserRepository::new();
        users
            .expect_list_admins()
            .times(1)
            .returning(move || Ok(admins.clone()));

        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_create_many()
            .withf(move |rows| {
                rows.len() == 2 && rows.iter().zip(&ids).all(|(row, id)| row.user_id == *id && !row.read)
            })
            .times(1)
            .returning(|_| Ok(()));

        let notifier = InAppNotifier::new(Arc::new(notifications), Arc::new(users));
        assert!(notifier.send_to_admins(sample()).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_delivery_is_swallowed() {
        let mut sender = MockNotificationSender::new();
        sender
            .expect_send()
            .times(1)
            .returning(|_, _| Err(AppError::internal("store down")));

        // Must not panic or propagate
        notify(&sender, Uuid::new_v4(), sample()).await;
    }

    #[tokio::test]
    async fn test_mark_read_of_foreign_notification_is_not_found() {
        let actor = Actor {
            id: Uuid::new_v4(),
            name: "Awa".to_string(),
            phone: "771234567".to_string(),
            role: Role::Buyer,
            tier: Tier::Standard,
        };
        let notification_id = Uuid::new_v4();

        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read()
            .with(eq(notification_id), eq(actor.id))
            .returning(|_, _| Ok(false));

        let service = NotificationManager::new(Arc::new(repo));
        let err = service
            .mark_notification_read(&actor, notification_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
