//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{DeliveryDefaults, Role, Tier, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub phone: String,
    pub name: String,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub tier: String,
    pub premium_payment_pending: bool,
    pub premium_request_date: Option<DateTimeUtc>,
    pub delivery_name: Option<String>,
    pub delivery_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_city: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            phone: model.phone,
            name: model.name,
            avatar: model.avatar,
            location: model.location,
            password_hash: model.password_hash,
            role: Role::from(model.role.as_str()),
            tier: Tier::from(model.tier.as_str()),
            premium_payment_pending: model.premium_payment_pending,
            premium_request_date: model.premium_request_date,
            delivery: DeliveryDefaults {
                name: model.delivery_name,
                phone: model.delivery_phone,
                address: model.delivery_address,
                city: model.delivery_city,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Full-row active model; every column is written.
impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        ActiveModel {
            id: Set(user.id),
            phone: Set(user.phone.clone()),
            name: Set(user.name.clone()),
            avatar: Set(user.avatar.clone()),
            location: Set(user.location.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_string()),
            tier: Set(user.tier.as_str().to_string()),
            premium_payment_pending: Set(user.premium_payment_pending),
            premium_request_date: Set(user.premium_request_date),
            delivery_name: Set(user.delivery.name.clone()),
            delivery_phone: Set(user.delivery.phone.clone()),
            delivery_address: Set(user.delivery.address.clone()),
            delivery_city: Set(user.delivery.city.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}
