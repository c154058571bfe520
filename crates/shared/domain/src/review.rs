//! Buyer reviews on completed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_RATING, MIN_RATING};
use crate::error::{DomainError, DomainResult};
use crate::messages;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Review {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub seller_id: Uuid,
    /// Reviewer (the order's buyer)
    pub user_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewReview {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
}

impl NewReview {
    pub fn validate(&self) -> DomainResult<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(DomainError::validation(messages::RATING_INVALID));
        }
        Ok(())
    }
}

/// Aggregated rating of a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SellerRating {
    pub seller_id: Uuid,
    pub average: f64,
    pub count: u64,
}

impl SellerRating {
    pub fn from_reviews(seller_id: Uuid, reviews: &[Review]) -> Self {
        let count = reviews.len() as u64;
        let sum: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
        let average = if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        };
        Self {
            seller_id,
            average,
            count,
        }
    }
}
