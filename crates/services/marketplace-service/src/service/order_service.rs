//! Order lifecycle - checkout, self-reported payment and admin fulfilment.
//!
//! The buyer only ever triggers `pending_payment -> paid`; every later step
//! is an admin action and notifies the buyer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    messages, policy, Actor, Cart, DeliveryInfo, Notification, Order, OrderStatus,
};

use crate::repository::{OrderRepository, ProductRepository};
use crate::service::notification_service::{notify, notify_admins, NotificationSender};

/// One line of a checkout request: which listing, how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[async_trait]
pub trait OrderService: Send + Sync {
    /// Rebuild a cart from live listings, applying the cart's own rules
    async fn fill_cart(&self, lines: &[CartLine]) -> AppResult<Cart>;

    /// Create an order from the cart and clear it on success.
    ///
    /// A non-blank transaction reference creates the order directly as paid.
    async fn checkout(
        &self,
        actor: &Actor,
        cart: &mut Cart,
        delivery: DeliveryInfo,
        transaction_reference: Option<String>,
    ) -> AppResult<Order>;

    /// Buyer self-report; the reference is optional
    async fn mark_paid(
        &self,
        actor: &Actor,
        id: Uuid,
        transaction_reference: Option<String>,
    ) -> AppResult<Order>;

    async fn validate_order(&self, actor: &Actor, id: Uuid) -> AppResult<Order>;

    async fn reject_order(&self, actor: &Actor, id: Uuid, reason: &str) -> AppResult<Order>;

    async fn ship_order(&self, actor: &Actor, id: Uuid) -> AppResult<Order>;

    async fn complete_order(&self, actor: &Actor, id: Uuid) -> AppResult<Order>;

    /// Buyer or admin
    async fn get_order(&self, actor: &Actor, id: Uuid) -> AppResult<Order>;

    async fn list_my_orders(&self, actor: &Actor) -> AppResult<Vec<Order>>;

    async fn list_orders(&self, actor: &Actor, status: Option<OrderStatus>) -> AppResult<Vec<Order>>;
}

pub struct OrderManager {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
    notifier: Arc<dyn NotificationSender>,
}

impl OrderManager {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            orders,
            products,
            notifier,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_not_found(messages::ORDER_NOT_FOUND)
    }

    /// Load, check admin, apply `step`, persist, notify the buyer.
    async fn admin_transition<F>(
        &self,
        actor: &Actor,
        id: Uuid,
        step: F,
        notification: fn(&Order) -> Notification,
    ) -> AppResult<Order>
    where
        F: FnOnce(&mut Order) -> domain::DomainResult<()> + Send,
    {
        policy::require_admin(actor)?;
        let mut order = self.load(id).await?;

        step(&mut order)?;
        let order = self.orders.update(order).await?;
        info!(
            order_id = %order.id,
            admin_id = %actor.id,
            status = order.status.as_str(),
            "Order status changed"
        );

        notify(self.notifier.as_ref(), order.user_id, notification(&order)).await;
        Ok(order)
    }
}

#[async_trait]
impl OrderService for OrderManager {
    async fn fill_cart(&self, lines: &[CartLine]) -> AppResult<Cart> {
        let mut cart = Cart::new();
        for line in lines {
            let product = self
                .products
                .find_by_id(line.product_id)
                .await?
                .ok_or_not_found(messages::PRODUCT_NOT_FOUND)?;
            cart.add(&product, line.quantity)?;
        }
        Ok(cart)
    }

    async fn checkout(
        &self,
        actor: &Actor,
        cart: &mut Cart,
        delivery: DeliveryInfo,
        transaction_reference: Option<String>,
    ) -> AppResult<Order> {
        let order = Order::place(
            Uuid::new_v4(),
            actor,
            cart.to_order_items(),
            delivery,
            transaction_reference,
        )?;

        let order = self.orders.create(order).await?;
        cart.clear();
        info!(
            order_id = %order.id,
            buyer_id = %actor.id,
            total = order.total_amount,
            status = order.status.as_str(),
            "Order placed"
        );

        if order.status == OrderStatus::Paid {
            notify_admins(self.notifier.as_ref(), Notification::payment_submitted(&order)).await;
        }
        Ok(order)
    }

    async fn mark_paid(
        &self,
        actor: &Actor,
        id: Uuid,
        transaction_reference: Option<String>,
    ) -> AppResult<Order> {
        let mut order = self.load(id).await?;
        if !order.is_bought_by(actor.id) {
            return Err(AppError::forbidden(messages::NOT_ORDER_BUYER));
        }

        order.mark_paid(transaction_reference)?;
        let order = self.orders.update(order).await?;
        info!(order_id = %order.id, buyer_id = %actor.id, "Payment reported by buyer");

        notify_admins(self.notifier.as_ref(), Notification::payment_submitted(&order)).await;
        Ok(order)
    }

    async fn validate_order(&self, actor: &Actor, id: Uuid) -> AppResult<Order> {
        self.admin_transition(actor, id, Order::validate_payment, Notification::order_validated)
            .await
    }

    async fn reject_order(&self, actor: &Actor, id: Uuid, reason: &str) -> AppResult<Order> {
        policy::require_admin(actor)?;
        let mut order = self.load(id).await?;

        order.reject(reason)?;
        let order = self.orders.update(order).await?;
        info!(order_id = %order.id, admin_id = %actor.id, "Order rejected");

        let reason = order.rejection_reason.clone().unwrap_or_default();
        notify(
            self.notifier.as_ref(),
            order.user_id,
            Notification::order_rejected(&order, &reason),
        )
        .await;
        Ok(order)
    }

    async fn ship_order(&self, actor: &Actor, id: Uuid) -> AppResult<Order> {
        self.admin_transition(actor, id, Order::ship, Notification::order_shipped)
            .await
    }

    async fn complete_order(&self, actor: &Actor, id: Uuid) -> AppResult<Order> {
        self.admin_transition(actor, id, Order::complete, Notification::order_completed)
            .await
    }

    async fn get_order(&self, actor: &Actor, id: Uuid) -> AppResult<Order> {
        let order = self.load(id).await?;
        if policy::can_view_order(actor, &order) {
            Ok(order)
        } else {
            Err(AppError::forbidden(messages::NOT_ORDER_BUYER))
        }
    }

    async fn list_my_orders(&self, actor: &Actor) -> AppResult<Vec<Order>> {
        self.orders.list_by_user(actor.id).await
    }

    async fn list_orders(&self, actor: &Actor, status: Option<OrderStatus>) -> AppResult<Vec<Order>> {
        policy::require_admin(actor)?;
        self.orders.list(status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Condition, NewProduct, Product, Role, Tier};
    use mockall::predicate::eq;

    use crate::repository::{MockOrderRepository, MockProductRepository};
    use crate::service::notification_service::MockNotificationSender;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            name: "Moussa".to_string(),
            phone: "770000001".to_string(),
            role,
            tier: Tier::Standard,
        }
    }

    fn delivery() -> DeliveryInfo {
        DeliveryInfo {
            name: "Moussa Diop".to_string(),
            phone: "770000001".to_string(),
            address: "Rue 10, Médina".to_string(),
            city: "Dakar".to_string(),
        }
    }

    fn approved_product(price: i64) -> Product {
        let mut product = Product::submit(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NewProduct {
                title: "Sac en cuir".to_string(),
                description: "Fait main".to_string(),
                price,
                images: vec!["https://img.example/sac.jpg".to_string()],
                category: "mode".to_string(),
                location: "Dakar".to_string(),
                condition: Some(Condition::New),
                ..Default::default()
            },
        );
        product.approve(Uuid::new_v4());
        product
    }

    fn manager(
        orders: MockOrderRepository,
        products: MockProductRepository,
        notifier: MockNotificationSender,
    ) -> OrderManager {
        OrderManager::new(Arc::new(orders), Arc::new(products), Arc::new(notifier))
    }

    fn placed_order(buyer: &Actor, product: &Product, quantity: u32) -> Order {
        let mut cart = Cart::new();
        cart.add(product, quantity).unwrap();
        Order::place(Uuid::new_v4(), buyer, cart.to_order_items(), delivery(), None).unwrap()
    }

    #[tokio::test]
    async fn test_checkout_without_reference_is_pending_and_clears_cart() {
        let buyer = actor(Role::Buyer);
        let product = approved_product(10_000);
        let mut cart = Cart::new();
        cart.add(&product, 2).unwrap();

        let mut orders = MockOrderRepository::new();
        orders.expect_create().times(1).returning(|o| Ok(o));

        let mut notifier = MockNotificationSender::new();
        notifier.expect_send_to_admins().never();

        let service = manager(orders, MockProductRepository::new(), notifier);
        let order = service
            .checkout(&buyer, &mut cart, delivery(), Some("   ".to_string()))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::PendingPayment);
        assert_eq!(order.total_amount, 20_000);
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_with_reference_is_paid_and_alerts_admins() {
        let buyer = actor(Role::Buyer);
        let product = approved_product(5_000);
        let mut cart = Cart::new();
        cart.add(&product, 1).unwrap();

        let mut orders = MockOrderRepository::new();
        orders.expect_create().returning(|o| Ok(o));

        let mut notifier = MockNotificationSender::new();
        notifier
            .expect_send_to_admins()
            .times(1)
            .returning(|_| Ok(()));

        let service = manager(orders, MockProductRepository::new(), notifier);
        let order = service
            .checkout(&buyer, &mut cart, delivery(), Some("WAVE-42".to_string()))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Paid);
        assert!(order.paid_at.is_some());
        assert_eq!(order.wave_transaction_id.as_deref(), Some("WAVE-42"));
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let buyer = actor(Role::Buyer);
        let product = approved_product(5_000);
        let mut cart = Cart::new();
        cart.add(&product, 1).unwrap();

        let mut orders = MockOrderRepository::new();
        orders
            .expect_create()
            .returning(|_| Err(AppError::internal("connection refused")));

        let service = manager(orders, MockProductRepository::new(), MockNotificationSender::new());
        let result = service.checkout(&buyer, &mut cart, delivery(), None).await;

        assert!(result.is_err());
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn test_fill_cart_refuses_pending_listing() {
        let pending = Product::submit(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NewProduct {
                title: "Vélo".to_string(),
                description: "VTT".to_string(),
                price: 50_000,
                images: vec!["https://img.example/velo.jpg".to_string()],
                category: "sport".to_string(),
                location: "Saint-Louis".to_string(),
                condition: Some(Condition::Used),
                ..Default::default()
            },
        );
        let pending_id = pending.id;

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .with(eq(pending_id))
            .returning(move |_| Ok(Some(pending.clone())));

        let service = manager(MockOrderRepository::new(), products, MockNotificationSender::new());
        let err = service
            .fill_cart(&[CartLine {
                product_id: pending_id,
                quantity: 1,
            }])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), messages::PRODUCT_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_only_buyer_can_report_payment() {
        let buyer = actor(Role::Buyer);
        let order = placed_order(&buyer, &approved_product(1_000), 1);
        let order_id = order.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        orders.expect_update().never();

        let service = manager(orders, MockProductRepository::new(), MockNotificationSender::new());
        let stranger = actor(Role::Buyer);
        let err = service
            .mark_paid(&stranger, order_id, Some("WAVE1".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_validate_requires_admin() {
        let buyer = actor(Role::Buyer);

        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_id().never();

        let service = manager(orders, MockProductRepository::new(), MockNotificationSender::new());
        let err = service
            .validate_order(&buyer, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_illegal_transition_is_not_persisted() {
        let buyer = actor(Role::Buyer);
        let admin = actor(Role::Admin);
        let order = placed_order(&buyer, &approved_product(1_000), 1);
        let order_id = order.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        orders.expect_update().never();

        let mut notifier = MockNotificationSender::new();
        notifier.expect_send().never();

        let service = manager(orders, MockProductRepository::new(), notifier);
        let err = service.ship_order(&admin, order_id).await.unwrap_err();
        assert!(matches!(err, AppError::IllegalTransition(_)));
    }

    #[tokio::test]
    async fn test_reject_notifies_buyer_with_reason() {
        let buyer = actor(Role::Buyer);
        let admin = actor(Role::Admin);
        let mut order = placed_order(&buyer, &approved_product(1_000), 1);
        order.mark_paid(None).unwrap();
        let order_id = order.id;
        let buyer_id = buyer.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        orders.expect_update().returning(|o| Ok(o));

        let mut notifier = MockNotificationSender::new();
        notifier
            .expect_send()
            .withf(move |user_id, n| *user_id == buyer_id && n.message.contains("référence introuvable"))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = manager(orders, MockProductRepository::new(), notifier);
        let order = service
            .reject_order(&admin, order_id, "référence introuvable")
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Rejected);
        assert!(order.rejected_at.is_some());
    }

    #[tokio::test]
    async fn test_stranger_cannot_view_order() {
        let buyer = actor(Role::Buyer);
        let order = placed_order(&buyer, &approved_product(1_000), 1);
        let order_id = order.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order.clone())));

        let service = manager(orders, MockProductRepository::new(), MockNotificationSender::new());
        assert!(service.get_order(&buyer, order_id).await.is_ok());
        assert!(service.get_order(&actor(Role::Admin), order_id).await.is_ok());
        assert!(service.get_order(&actor(Role::Seller), order_id).await.is_err());
    }
}
