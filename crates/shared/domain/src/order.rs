//! Order entity and its status state machine.
//!
//! ```text
//! pending_payment --(buyer self-report)--> paid
//! paid            --(admin validate)-----> validated
//! paid            --(admin reject)-------> rejected    [terminal]
//! validated       --(admin ship)---------> shipped
//! shipped         --(admin complete)-----> completed   [terminal]
//! ```
//!
//! Re-invoking the transition that produced the current status re-stamps its
//! timestamp. Nothing ever moves backward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    ORDER_COMPLETED, ORDER_PAID, ORDER_PENDING_PAYMENT, ORDER_REJECTED, ORDER_SHIPPED,
    ORDER_VALIDATED, PAYMENT_METHOD_WAVE,
};
use crate::error::{DomainError, DomainResult};
use crate::messages;
use crate::product::ListingType;
use crate::user::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum OrderStatus {
    #[default]
    PendingPayment,
    Paid,
    Validated,
    Rejected,
    Shipped,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => ORDER_PENDING_PAYMENT,
            OrderStatus::Paid => ORDER_PAID,
            OrderStatus::Validated => ORDER_VALIDATED,
            OrderStatus::Rejected => ORDER_REJECTED,
            OrderStatus::Shipped => ORDER_SHIPPED,
            OrderStatus::Completed => ORDER_COMPLETED,
        }
    }

    /// French label used in notifications and errors.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "en attente de paiement",
            OrderStatus::Paid => "payée",
            OrderStatus::Validated => "validée",
            OrderStatus::Rejected => "rejetée",
            OrderStatus::Shipped => "expédiée",
            OrderStatus::Completed => "terminée",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Rejected | OrderStatus::Completed)
    }

    /// Status a transition into `self` must start from, if any.
    fn predecessor(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::PendingPayment => None,
            OrderStatus::Paid => Some(OrderStatus::PendingPayment),
            OrderStatus::Validated | OrderStatus::Rejected => Some(OrderStatus::Paid),
            OrderStatus::Shipped => Some(OrderStatus::Validated),
            OrderStatus::Completed => Some(OrderStatus::Shipped),
        }
    }

    /// Whether `self -> next` is an edge of the graph or a re-invocation of
    /// the transition that produced `self`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match next.predecessor() {
            Some(from) => from == *self || next == *self,
            None => false,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s {
            ORDER_PAID => OrderStatus::Paid,
            ORDER_VALIDATED => OrderStatus::Validated,
            ORDER_REJECTED => OrderStatus::Rejected,
            ORDER_SHIPPED => OrderStatus::Shipped,
            ORDER_COMPLETED => OrderStatus::Completed,
            _ => OrderStatus::PendingPayment,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum PaymentMethod {
    #[default]
    Wave,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Wave => PAYMENT_METHOD_WAVE,
        }
    }
}

/// Listing data frozen at the time it entered a cart or an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductSnapshot {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub image: Option<String>,
    pub listing_type: ListingType,
    /// Effective unit price (discount applied) when captured
    pub unit_price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OrderItem {
    pub product: ProductSnapshot,
    pub quantity: u32,
    /// Frozen at order creation, never recomputed from the live listing
    pub price_at_purchase: i64,
}

impl OrderItem {
    pub fn line_total(&self) -> Option<i64> {
        self.price_at_purchase.checked_mul(i64::from(self.quantity))
    }
}

/// Delivery snapshot taken at checkout, independent of later profile edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeliveryInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

impl DeliveryInfo {
    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            (&self.name, messages::DELIVERY_NAME_REQUIRED),
            (&self.phone, messages::DELIVERY_PHONE_REQUIRED),
            (&self.address, messages::DELIVERY_ADDRESS_REQUIRED),
            (&self.city, messages::DELIVERY_CITY_REQUIRED),
        ];
        for (value, message) in fields {
            if value.trim().is_empty() {
                return Err(DomainError::validation(message));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_phone: String,
    pub items: Vec<OrderItem>,
    pub total_amount: i64,
    pub payment_method: PaymentMethod,
    pub wave_transaction_id: Option<String>,
    pub delivery: DeliveryInfo,
    pub status: OrderStatus,
    pub rejection_reason: Option<String>,
    pub has_review: bool,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub validated_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Treat a blank reference as "not supplied".
fn normalize_reference(reference: Option<String>) -> Option<String> {
    reference
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

impl Order {
    /// Create an order from checkout items.
    ///
    /// The total is computed once here. A non-empty transaction reference
    /// creates the order directly in `paid`, without verification.
    pub fn place(
        id: Uuid,
        buyer: &Actor,
        items: Vec<OrderItem>,
        delivery: DeliveryInfo,
        transaction_reference: Option<String>,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation(messages::EMPTY_CART));
        }
        if items.iter().any(|item| item.quantity == 0) {
            return Err(DomainError::validation(messages::QUANTITY_INVALID));
        }
        delivery.validate()?;

        let total_amount = items
            .iter()
            .try_fold(0i64, |acc, item| item.line_total()?.checked_add(acc))
            .ok_or_else(|| DomainError::validation(messages::AMOUNT_OVERFLOW))?;

        let reference = normalize_reference(transaction_reference);
        let now = Utc::now();
        let (status, paid_at) = match reference {
            Some(_) => (OrderStatus::Paid, Some(now)),
            None => (OrderStatus::PendingPayment, None),
        };

        Ok(Self {
            id,
            user_id: buyer.id,
            user_name: buyer.name.clone(),
            user_phone: buyer.phone.clone(),
            items,
            total_amount,
            payment_method: PaymentMethod::Wave,
            wave_transaction_id: reference,
            delivery,
            status,
            rejection_reason: None,
            has_review: false,
            created_at: now,
            paid_at,
            validated_at: None,
            rejected_at: None,
            shipped_at: None,
            completed_at: None,
            updated_at: now,
        })
    }

    pub fn is_bought_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Sum of frozen line totals.
    pub fn computed_total(&self) -> Option<i64> {
        self.items
            .iter()
            .try_fold(0i64, |acc, item| item.line_total()?.checked_add(acc))
    }

    pub fn item_for_product(&self, product_id: Uuid) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }

    /// Check the graph and move to `next`, returning the stamp time.
    ///
    /// Leaves the order untouched on refusal.
    fn transition(&mut self, next: OrderStatus) -> DomainResult<DateTime<Utc>> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::illegal_transition(format!(
                "Impossible de passer une commande {} à l'état {}",
                self.status.label(),
                next.label()
            )));
        }
        let now = Utc::now();
        self.status = next;
        self.updated_at = now;
        Ok(now)
    }

    /// Buyer self-reported payment. The reference is optional.
    pub fn mark_paid(&mut self, transaction_reference: Option<String>) -> DomainResult<()> {
        let now = self.transition(OrderStatus::Paid)?;
        self.paid_at = Some(now);
        if let Some(reference) = normalize_reference(transaction_reference) {
            self.wave_transaction_id = Some(reference);
        }
        Ok(())
    }

    pub fn validate_payment(&mut self) -> DomainResult<()> {
        let now = self.transition(OrderStatus::Validated)?;
        self.validated_at = Some(now);
        Ok(())
    }

    /// Admin rejection; a non-blank reason is required.
    pub fn reject(&mut self, reason: &str) -> DomainResult<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::validation(
                messages::ORDER_REJECTION_REASON_REQUIRED,
            ));
        }
        let now = self.transition(OrderStatus::Rejected)?;
        self.rejected_at = Some(now);
        self.rejection_reason = Some(reason.to_string());
        Ok(())
    }

    pub fn ship(&mut self) -> DomainResult<()> {
        let now = self.transition(OrderStatus::Shipped)?;
        self.shipped_at = Some(now);
        Ok(())
    }

    pub fn complete(&mut self) -> DomainResult<()> {
        let now = self.transition(OrderStatus::Completed)?;
        self.completed_at = Some(now);
        Ok(())
    }
}
