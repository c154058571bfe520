//! In-app notification database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{NotificationKind, StoredNotification};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,
    pub read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for StoredNotification {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = NotificationKind::parse(&model.kind)
            .ok_or_else(|| DbErr::Type(format!("unknown notification kind: {}", model.kind)))?;

        Ok(StoredNotification {
            id: model.id,
            user_id: model.user_id,
            kind,
            title: model.title,
            message: model.message,
            data: model.data,
            read: model.read,
            created_at: model.created_at,
        })
    }
}

impl From<&StoredNotification> for ActiveModel {
    fn from(notification: &StoredNotification) -> Self {
        ActiveModel {
            id: Set(notification.id),
            user_id: Set(notification.user_id),
            kind: Set(notification.kind.as_str().to_string()),
            title: Set(notification.title.clone()),
            message: Set(notification.message.clone()),
            data: Set(notification.data.clone()),
            read: Set(notification.read),
            created_at: Set(notification.created_at),
        }
    }
}
