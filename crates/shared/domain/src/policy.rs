//! Authorization predicates and tier gates.
//!
//! Pure checks consumed by the controllers before any store call. The
//! boolean predicates answer "may this happen"; the `check_*` variants
//! return the specific message to show when it may not.

use uuid::Uuid;

use crate::constants::{STANDARD_MAX_ACTIVE_LISTINGS, STANDARD_MAX_IMAGES};
use crate::error::{DomainError, DomainResult};
use crate::messages;
use crate::order::{Order, OrderStatus};
use crate::product::{NewProduct, Product, ProductPatch};
use crate::user::{Actor, User};

/// Unwrap the session, failing with "must be logged in".
pub fn require_actor(actor: Option<&Actor>) -> DomainResult<&Actor> {
    actor.ok_or_else(|| DomainError::Unauthenticated(messages::LOGIN_REQUIRED.to_string()))
}

pub fn is_admin(actor: &Actor) -> bool {
    actor.is_admin()
}

pub fn is_super_admin(actor: &Actor) -> bool {
    actor.is_super_admin()
}

pub fn require_admin(actor: &Actor) -> DomainResult<()> {
    if is_admin(actor) {
        Ok(())
    } else {
        Err(DomainError::forbidden(messages::ADMIN_REQUIRED))
    }
}

pub fn require_super_admin(actor: &Actor) -> DomainResult<()> {
    if is_super_admin(actor) {
        Ok(())
    } else {
        Err(DomainError::forbidden(messages::SUPER_ADMIN_REQUIRED))
    }
}

// =============================================================================
// Listings
// =============================================================================

/// Standard accounts hold fewer than five active listings; premium is unbounded.
pub fn can_add_product(actor: &Actor, active_listings: u64) -> bool {
    actor.is_premium() || active_listings < STANDARD_MAX_ACTIVE_LISTINGS
}

pub fn check_listing_quota(actor: &Actor, active_listings: u64) -> DomainResult<()> {
    if can_add_product(actor, active_listings) {
        Ok(())
    } else {
        Err(DomainError::quota(messages::listing_quota_reached()))
    }
}

fn check_image_count(actor: &Actor, images: &[String]) -> DomainResult<()> {
    if !actor.is_premium() && images.len() > STANDARD_MAX_IMAGES {
        Err(DomainError::quota(messages::image_quota_reached()))
    } else {
        Ok(())
    }
}

/// Tier gates on a submission: image count, stock, discount.
pub fn check_new_listing(actor: &Actor, input: &NewProduct) -> DomainResult<()> {
    check_image_count(actor, &input.images)?;
    if actor.is_premium() {
        return Ok(());
    }
    if input.uses_stock() {
        return Err(DomainError::forbidden(messages::STOCK_PREMIUM_ONLY));
    }
    if input.uses_discount() {
        return Err(DomainError::forbidden(messages::DISCOUNT_PREMIUM_ONLY));
    }
    Ok(())
}

/// Owner-only edit. Standard accounts keep premium-gated fields that were
/// already set but cannot newly enable them.
pub fn check_listing_edit(
    actor: &Actor,
    product: &Product,
    patch: &ProductPatch,
) -> DomainResult<()> {
    if !product.is_owned_by(actor.id) {
        return Err(DomainError::forbidden(messages::NOT_PRODUCT_OWNER));
    }
    if let Some(images) = &patch.images {
        check_image_count(actor, images)?;
    }
    if actor.is_premium() || !patch.touches_premium_fields() {
        return Ok(());
    }

    if patch.stock_quantity.is_some() && product.stock_quantity.is_none() {
        return Err(DomainError::forbidden(messages::STOCK_PREMIUM_ONLY));
    }
    let enables_discount = patch.has_discount == Some(true)
        || (patch.discount_percent.is_some() && patch.has_discount != Some(false));
    if enables_discount && !product.has_discount {
        return Err(DomainError::forbidden(messages::DISCOUNT_PREMIUM_ONLY));
    }
    if patch.is_out_of_stock == Some(true) && !product.is_out_of_stock {
        return Err(DomainError::forbidden(messages::OUT_OF_STOCK_PREMIUM_ONLY));
    }
    Ok(())
}

/// Approved listings are public; others only reach their owner and admins.
pub fn can_view_product(viewer: Option<&Actor>, product: &Product) -> bool {
    product.is_approved()
        || viewer.is_some_and(|actor| actor.is_admin() || product.is_owned_by(actor.id))
}

pub fn can_delete_product(actor: &Actor, product: &Product) -> bool {
    actor.is_admin() || product.is_owned_by(actor.id)
}

// =============================================================================
// Orders & reviews
// =============================================================================

pub fn can_view_order(actor: &Actor, order: &Order) -> bool {
    actor.is_admin() || order.is_bought_by(actor.id)
}

/// Completed order, reviewed by its own buyer, no earlier review.
pub fn can_review(order: &Order, actor: &Actor, already_reviewed: bool) -> bool {
    order.status == OrderStatus::Completed && order.is_bought_by(actor.id) && !already_reviewed
}

pub fn check_review(
    order: &Order,
    actor: &Actor,
    product_id: Uuid,
    already_reviewed: bool,
) -> DomainResult<()> {
    if !order.is_bought_by(actor.id) {
        return Err(DomainError::forbidden(messages::REVIEW_NOT_BUYER));
    }
    if order.status != OrderStatus::Completed {
        return Err(DomainError::validation(messages::REVIEW_ORDER_NOT_COMPLETED));
    }
    if order.item_for_product(product_id).is_none() {
        return Err(DomainError::validation(messages::REVIEW_PRODUCT_NOT_IN_ORDER));
    }
    if already_reviewed {
        return Err(DomainError::conflict(messages::REVIEW_ALREADY_SUBMITTED));
    }
    Ok(())
}

// =============================================================================
// Account administration
// =============================================================================

/// Admin grant/revoke: super-admin only, and never against a super-admin.
pub fn check_admin_toggle(actor: &Actor, target: &User) -> DomainResult<()> {
    require_super_admin(actor)?;
    if target.is_super_admin() {
        return Err(DomainError::forbidden(messages::SUPER_ADMIN_IMMUTABLE));
    }
    Ok(())
}

pub fn check_user_deletion(actor: &Actor, target: &User) -> DomainResult<()> {
    require_admin(actor)?;
    if target.is_super_admin() {
        return Err(DomainError::forbidden(messages::SUPER_ADMIN_UNDELETABLE));
    }
    if target.id == actor.id {
        return Err(DomainError::forbidden(messages::CANNOT_DELETE_SELF));
    }
    Ok(())
}
