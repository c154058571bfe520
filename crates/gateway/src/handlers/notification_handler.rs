//! In-app notification handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use common::AppResult;
use domain::{NotificationKind, StoredNotification};

use crate::extractors::CurrentUser;
use crate::state::AppState;

/// A notification as shown in the inbox
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Identifiers of the listing, order or account concerned
    #[schema(value_type = Object)]
    pub data: Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<StoredNotification> for NotificationResponse {
    fn from(n: StoredNotification) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            title: n.title,
            message: n.message,
            data: n.data,
            read: n.read,
            created_at: n.created_at,
        }
    }
}

/// Own notifications, newest first
#[utoipa::path(
    get,
    path = "/me/notifications",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inbox", body = Vec<NotificationResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_notifications(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let notifications = state
        .services
        .notifications()
        .list_notifications(&actor)
        .await?;
    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// Mark one of the caller's notifications as read
#[utoipa::path(
    post,
    path = "/me/notifications/{id}/read",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn mark_notification_read(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .services
        .notifications()
        .mark_notification_read(&actor, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
