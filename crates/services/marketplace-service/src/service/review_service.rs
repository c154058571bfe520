//! Buyer reviews on completed orders and per-seller rating aggregates.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{messages, policy, Actor, NewReview, Review, SellerRating};

use crate::repository::{OrderRepository, ReviewRepository};

#[async_trait]
pub trait ReviewService: Send + Sync {
    /// One review per (order, buyer), only once the order is completed
    async fn submit_review(&self, actor: &Actor, input: NewReview) -> AppResult<Review>;

    async fn list_product_reviews(&self, product_id: Uuid) -> AppResult<Vec<Review>>;

    async fn seller_rating(&self, seller_id: Uuid) -> AppResult<SellerRating>;
}

pub struct ReviewManager {
    reviews: Arc<dyn ReviewRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl ReviewManager {
    pub fn new(reviews: Arc<dyn ReviewRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { reviews, orders }
    }
}

#[async_trait]
impl ReviewService for ReviewManager {
    async fn submit_review(&self, actor: &Actor, input: NewReview) -> AppResult<Review> {
        input.validate()?;

        let order = self
            .orders
            .find_by_id(input.order_id)
            .await?
            .ok_or_not_found(messages::ORDER_NOT_FOUND)?;
        let already = self.reviews.exists_for(order.id, actor.id).await?;
        policy::check_review(&order, actor, input.product_id, already)?;

        let seller_id = order
            .item_for_product(input.product_id)
            .map(|item| item.product.seller_id)
            .ok_or_else(|| AppError::validation(messages::REVIEW_PRODUCT_NOT_IN_ORDER))?;

        let comment = input
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let review = Review {
            id: Uuid::new_v4(),
            order_id: order.id,
            product_id: input.product_id,
            seller_id,
            user_id: actor.id,
            rating: input.rating,
            comment,
            created_at: Utc::now(),
        };

        let review = self.reviews.create(review).await?;
        info!(
            review_id = %review.id,
            order_id = %review.order_id,
            rating = review.rating,
            "Review submitted"
        );
        Ok(review)
    }

    async fn list_product_reviews(&self, product_id: Uuid) -> AppResult<Vec<Review>> {
        self.reviews.list_by_product(product_id).await
    }

    async fn seller_rating(&self, seller_id: Uuid) -> AppResult<SellerRating> {
        let reviews = self.reviews.list_by_seller(seller_id).await?;
        Ok(SellerRating::from_reviews(seller_id, &reviews))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{
        Cart, Condition, DeliveryInfo, NewProduct, Order, Product, Role, Tier,
    };
    use mockall::predicate::eq;

    use crate::repository::{MockOrderRepository, MockReviewRepository};

    fn buyer() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            name: "Fatou".to_string(),
            phone: "781112233".to_string(),
            role: Role::Buyer,
            tier: Tier::Standard,
        }
    }

    fn product() -> Product {
        let mut product = Product::submit(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NewProduct {
                title: "Boubou brodé".to_string(),
                description: "Bazin riche".to_string(),
                price: 25_000,
                images: vec!["https://img.example/boubou.jpg".to_string()],
                category: "mode".to_string(),
                location: "Thiès".to_string(),
                condition: Some(Condition::New),
                ..Default::default()
            },
        );
        product.approve(Uuid::new_v4());
        product
    }

    fn order_for(actor: &Actor, product: &Product, complete: bool) -> Order {
        let mut cart = Cart::new();
        cart.add(product, 1).unwrap();
        let delivery = DeliveryInfo {
            name: actor.name.clone(),
            phone: actor.phone.clone(),
            address: "Cité Keur Gorgui".to_string(),
            city: "Dakar".to_string(),
        };
        let mut order = Order::place(
            Uuid::new_v4(),
            actor,
            cart.to_order_items(),
            delivery,
            Some("WAVE-7".to_string()),
        )
        .unwrap();
        if complete {
            order.validate_payment().unwrap();
            order.ship().unwrap();
            order.complete().unwrap();
        }
        order
    }

    fn manager(reviews: MockReviewRepository, orders: MockOrderRepository) -> ReviewManager {
        ReviewManager::new(Arc::new(reviews), Arc::new(orders))
    }

    #[tokio::test]
    async fn test_review_on_completed_order() {
        let actor = buyer();
        let product = product();
        let order = order_for(&actor, &product, true);
        let order_id = order.id;
        let seller_id = product.seller_id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .with(eq(order_id))
            .returning(move |_| Ok(Some(order.clone())));

        let mut reviews = MockReviewRepository::new();
        reviews.expect_exists_for().returning(|_, _| Ok(false));
        reviews.expect_create().times(1).returning(|r| Ok(r));

        let review = manager(reviews, orders)
            .submit_review(
                &actor,
                NewReview {
                    order_id,
                    product_id: product.id,
                    rating: 5,
                    comment: Some("  Très belle qualité ".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(review.seller_id, seller_id);
        assert_eq!(review.comment.as_deref(), Some("Très belle qualité"));
    }

    #[tokio::test]
    async fn test_second_review_conflicts() {
        let actor = buyer();
        let product = product();
        let order = order_for(&actor, &product, true);
        let order_id = order.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order.clone())));

        let mut reviews = MockReviewRepository::new();
        reviews.expect_exists_for().returning(|_, _| Ok(true));
        reviews.expect_create().never();

        let err = manager(reviews, orders)
            .submit_review(
                &actor,
                NewReview {
                    order_id,
                    product_id: product.id,
                    rating: 4,
                    comment: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_review_before_completion_rejected() {
        let actor = buyer();
        let product = product();
        let order = order_for(&actor, &product, false);
        let order_id = order.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order.clone())));

        let mut reviews = MockReviewRepository::new();
        reviews.expect_exists_for().returning(|_, _| Ok(false));
        reviews.expect_create().never();

        let err = manager(reviews, orders)
            .submit_review(
                &actor,
                NewReview {
                    order_id,
                    product_id: product.id,
                    rating: 3,
                    comment: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), messages::REVIEW_ORDER_NOT_COMPLETED);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_never_hits_store() {
        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_id().never();

        let err = manager(MockReviewRepository::new(), orders)
            .submit_review(
                &buyer(),
                NewReview {
                    order_id: Uuid::new_v4(),
                    product_id: Uuid::new_v4(),
                    rating: 6,
                    comment: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_seller_rating_average() {
        let seller_id = Uuid::new_v4();
        let review = |rating| Review {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            seller_id,
            user_id: Uuid::new_v4(),
            rating,
            comment: None,
            created_at: Utc::now(),
        };
        let all = vec![review(5), review(4), review(3)];

        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_list_by_seller()
            .with(eq(seller_id))
            .returning(move |_| Ok(all.clone()));

        let rating = manager(reviews, MockOrderRepository::new())
            .seller_rating(seller_id)
            .await
            .unwrap();
        assert_eq!(rating.count, 3);
        assert!((rating.average - 4.0).abs() < f64::EPSILON);
    }
}
