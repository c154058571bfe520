//! Outbound notification messages produced by the lifecycle controllers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::order::Order;
use crate::product::Product;
use crate::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum NotificationKind {
    ProductSubmitted,
    ProductApproved,
    ProductRejected,
    PaymentSubmitted,
    OrderValidated,
    OrderRejected,
    OrderShipped,
    OrderCompleted,
    PremiumRequested,
    PremiumApproved,
    PremiumRejected,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ProductSubmitted => "product_submitted",
            NotificationKind::ProductApproved => "product_approved",
            NotificationKind::ProductRejected => "product_rejected",
            NotificationKind::PaymentSubmitted => "payment_submitted",
            NotificationKind::OrderValidated => "order_validated",
            NotificationKind::OrderRejected => "order_rejected",
            NotificationKind::OrderShipped => "order_shipped",
            NotificationKind::OrderCompleted => "order_completed",
            NotificationKind::PremiumRequested => "premium_requested",
            NotificationKind::PremiumApproved => "premium_approved",
            NotificationKind::PremiumRejected => "premium_rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let kind = match s {
            "product_submitted" => NotificationKind::ProductSubmitted,
            "product_approved" => NotificationKind::ProductApproved,
            "product_rejected" => NotificationKind::ProductRejected,
            "payment_submitted" => NotificationKind::PaymentSubmitted,
            "order_validated" => NotificationKind::OrderValidated,
            "order_rejected" => NotificationKind::OrderRejected,
            "order_shipped" => NotificationKind::OrderShipped,
            "order_completed" => NotificationKind::OrderCompleted,
            "premium_requested" => NotificationKind::PremiumRequested,
            "premium_approved" => NotificationKind::PremiumApproved,
            "premium_rejected" => NotificationKind::PremiumRejected,
            _ => return None,
        };
        Some(kind)
    }
}

/// Message handed to the notification port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: Value,
}

impl Notification {
    fn new(kind: NotificationKind, title: &str, message: String, data: Value) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
            data,
        }
    }

    pub fn product_submitted(product: &Product) -> Self {
        Self::new(
            NotificationKind::ProductSubmitted,
            "Nouvelle annonce à modérer",
            format!("« {} » attend votre validation", product.title),
            json!({ "product_id": product.id }),
        )
    }

    pub fn product_approved(product: &Product) -> Self {
        Self::new(
            NotificationKind::ProductApproved,
            "Annonce approuvée",
            format!("Votre annonce « {} » est maintenant en ligne", product.title),
            json!({ "product_id": product.id }),
        )
    }

    pub fn product_rejected(product: &Product, reason: &str) -> Self {
        Self::new(
            NotificationKind::ProductRejected,
            "Annonce refusée",
            format!("Votre annonce « {} » a été refusée : {}", product.title, reason),
            json!({ "product_id": product.id, "reason": reason }),
        )
    }

    pub fn payment_submitted(order: &Order) -> Self {
        let reference = order.wave_transaction_id.as_deref().unwrap_or("non fournie");
        Self::new(
            NotificationKind::PaymentSubmitted,
            "Paiement à vérifier",
            format!(
                "{} a déclaré avoir payé {} FCFA (référence Wave : {})",
                order.user_name, order.total_amount, reference
            ),
            json!({ "order_id": order.id, "transaction_id": order.wave_transaction_id }),
        )
    }

    pub fn order_validated(order: &Order) -> Self {
        Self::new(
            NotificationKind::OrderValidated,
            "Commande validée",
            "Votre paiement a été confirmé, votre commande est en préparation".to_string(),
            json!({ "order_id": order.id }),
        )
    }

    pub fn order_rejected(order: &Order, reason: &str) -> Self {
        Self::new(
            NotificationKind::OrderRejected,
            "Commande rejetée",
            format!("Votre commande a été rejetée : {}", reason),
            json!({ "order_id": order.id, "reason": reason }),
        )
    }

    pub fn order_shipped(order: &Order) -> Self {
        Self::new(
            NotificationKind::OrderShipped,
            "Commande expédiée",
            format!("Votre commande est en route vers {}", order.delivery.city),
            json!({ "order_id": order.id }),
        )
    }

    pub fn order_completed(order: &Order) -> Self {
        Self::new(
            NotificationKind::OrderCompleted,
            "Commande livrée",
            "Votre commande est terminée. Laissez un avis au vendeur !".to_string(),
            json!({ "order_id": order.id }),
        )
    }

    pub fn premium_requested(user: &User) -> Self {
        Self::new(
            NotificationKind::PremiumRequested,
            "Demande premium",
            format!("{} ({}) demande un compte premium", user.name, user.phone),
            json!({ "user_id": user.id }),
        )
    }

    pub fn premium_approved(user: &User) -> Self {
        Self::new(
            NotificationKind::PremiumApproved,
            "Compte premium activé",
            "Vous pouvez désormais publier sans limite".to_string(),
            json!({ "user_id": user.id }),
        )
    }

    pub fn premium_rejected(user: &User) -> Self {
        Self::new(
            NotificationKind::PremiumRejected,
            "Demande premium refusée",
            "Votre paiement n'a pas pu être vérifié".to_string(),
            json!({ "user_id": user.id }),
        )
    }
}

/// A delivered in-app notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
