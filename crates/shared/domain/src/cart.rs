//! Client-local shopping cart.
//!
//! Never persisted. Prices are captured from the listing when an item is
//! added and frozen into the order at checkout.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::messages;
use crate::order::{OrderItem, ProductSnapshot};
use crate::product::Product;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: ProductSnapshot,
    pub quantity: u32,
    /// Stock left when the item was added, if the seller manages stock
    pub stock_limit: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a listing, merging with an existing line for the same product.
    pub fn add(&mut self, product: &Product, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation(messages::QUANTITY_INVALID));
        }
        if !product.is_approved() {
            return Err(DomainError::validation(messages::PRODUCT_UNAVAILABLE));
        }
        if !product.is_available() {
            return Err(DomainError::validation(messages::PRODUCT_OUT_OF_STOCK));
        }

        let existing = self
            .items
            .iter()
            .position(|item| item.product.id == product.id);
        let already = existing.map_or(0, |idx| self.items[idx].quantity);
        let wanted = already.saturating_add(quantity);
        check_stock(product.stock_quantity, wanted)?;

        match existing {
            Some(idx) => {
                let item = &mut self.items[idx];
                item.quantity = wanted;
                item.product = product.snapshot();
                item.stock_limit = product.stock_quantity;
            }
            None => self.items.push(CartItem {
                product: product.snapshot(),
                quantity,
                stock_limit: product.stock_quantity,
            }),
        }
        Ok(())
    }

    pub fn set_quantity(&mut self, product_id: Uuid, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation(messages::QUANTITY_INVALID));
        }
        let item = self
            .items
            .iter_mut()
            .find(|item| item.product.id == product_id)
            .ok_or_else(|| DomainError::not_found(messages::NOT_IN_CART))?;
        check_stock(item.stock_limit, quantity)?;
        item.quantity = quantity;
        Ok(())
    }

    /// Returns false when the product was not in the cart.
    pub fn remove(&mut self, product_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product.id != product_id);
        self.items.len() != before
    }

    /// Sum of captured unit price × quantity, `None` on overflow.
    pub fn total(&self) -> Option<i64> {
        self.items.iter().try_fold(0i64, |acc, item| {
            item.product
                .unit_price
                .checked_mul(i64::from(item.quantity))?
                .checked_add(acc)
        })
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Freeze every line into an order item.
    pub fn to_order_items(&self) -> Vec<OrderItem> {
        self.items
            .iter()
            .map(|item| OrderItem {
                product: item.product.clone(),
                quantity: item.quantity,
                price_at_purchase: item.product.unit_price,
            })
            .collect()
    }
}

fn check_stock(stock: Option<i32>, wanted: u32) -> DomainResult<()> {
    match stock {
        Some(available) if i64::from(wanted) > i64::from(available) => Err(
            DomainError::validation(messages::insufficient_stock(available.max(0))),
        ),
        _ => Ok(()),
    }
}
