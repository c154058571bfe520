//! Review database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::Review;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Review {
    fn from(model: Model) -> Self {
        Review {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            seller_id: model.seller_id,
            user_id: model.user_id,
            rating: u8::try_from(model.rating).unwrap_or(0),
            comment: model.comment,
            created_at: model.created_at,
        }
    }
}

impl From<&Review> for ActiveModel {
    fn from(review: &Review) -> Self {
        ActiveModel {
            id: Set(review.id),
            order_id: Set(review.order_id),
            product_id: Set(review.product_id),
            seller_id: Set(review.seller_id),
            user_id: Set(review.user_id),
            rating: Set(i16::from(review.rating)),
            comment: Set(review.comment.clone()),
            created_at: Set(review.created_at),
        }
    }
}
